//! The interactive terminal frontend: one loop per screen, all game rules
//! delegated to [`sqlcards_core::GameSession`].
//!
//! The loops own the clocks the core refuses to: one-second intervals feed
//! the pre-game and timed tick methods, and flip resolution sleeps for the
//! delay the board hands back before calling `resolve_flips`.

use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlcards_core::shuffle::fisher_yates;
use sqlcards_core::{
    DropOutcome, FlipRejection, FlipResult, GameSession, MatchOutcome, PracticeGrade, PreGameTick,
    Resolution, Screen, SettingsUpdate, TimedAnswer, TimedTick,
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::audio::{play_all, AudioSink, FileSink};
use crate::deck::{load_deck, load_library, read_deck};
use crate::markdown::render_markdown;
use crate::openai::OpenAiClient;
use crate::store;

pub struct App {
    session: GameSession,
    deck_dir: PathBuf,
    settings_path: Option<PathBuf>,
    input: Lines<BufReader<Stdin>>,
}

/// Run the game until the player quits.
pub async fn run(deck_path: Option<PathBuf>, deck_dir: PathBuf) -> anyhow::Result<()> {
    let settings_path = store::default_path();
    let settings = match &settings_path {
        Some(path) => store::load(path),
        None => Default::default(),
    };

    let deck = match deck_path {
        Some(path) => load_deck(&path),
        None => load_deck(&deck_dir.join("sql_basics.json")),
    };
    tracing::info!(cards = deck.len(), "deck loaded");

    let mut app = App {
        session: GameSession::new(deck, settings),
        deck_dir,
        settings_path,
        input: BufReader::new(tokio::io::stdin()).lines(),
    };
    app.run().await
}

impl App {
    async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match self.session.screen() {
                Screen::ModeSelect => {
                    if !self.mode_select().await? {
                        return Ok(());
                    }
                }
                Screen::PreGame => self.pregame().await?,
                Screen::Concentration => self.concentration().await?,
                Screen::Listen => self.listen().await?,
                Screen::Practice => self.practice().await?,
                Screen::Timed => self.timed().await?,
                Screen::DragDrop => self.drag_drop().await?,
            }
        }
    }

    async fn read_line(&mut self) -> anyhow::Result<String> {
        let line = self
            .input
            .next_line()
            .await
            .context("reading from stdin")?
            .unwrap_or_else(|| "q".to_string());
        Ok(line.trim().to_string())
    }

    /// The main menu. Returns `false` when the player quits.
    async fn mode_select(&mut self) -> anyhow::Result<bool> {
        println!();
        println!("=== SQL Cards ===");
        println!("  1) concentration   2) listen   3) practice   4) timed   5) drag & drop");
        println!("  s) settings   l) deck library   i) import deck   q) quit");
        prompt();

        let choice = self.read_line().await?;
        match choice.as_str() {
            "1" => self.session.enter(Screen::PreGame, &mut rand::rng())?,
            "2" => self.session.enter(Screen::Listen, &mut rand::rng())?,
            "3" => self.session.enter(Screen::Practice, &mut rand::rng())?,
            "4" => self.session.enter(Screen::Timed, &mut rand::rng())?,
            "5" => self.session.enter(Screen::DragDrop, &mut rand::rng())?,
            "s" => self.settings_menu().await?,
            "l" => self.library_menu().await?,
            "i" => self.import_deck().await?,
            "q" => return Ok(false),
            other => println!("unknown option '{other}'"),
        }
        Ok(true)
    }

    /// Pre-game study screen. Ticks the auto-start countdown once a second
    /// while waiting for input.
    async fn pregame(&mut self) -> anyhow::Result<()> {
        self.print_study_cards();
        println!("  s) start   c) scramble   h) hide/show commands   e) hide/show descriptions");
        println!("  x) cancel auto-start   q) back");

        let mut ticker = tokio::time::interval(Duration::from_secs(1));
        ticker.tick().await; // the first tick fires immediately

        while self.session.screen() == Screen::PreGame {
            tokio::select! {
                line = self.input.next_line() => {
                    let line = line.context("reading from stdin")?.unwrap_or_else(|| "q".to_string());
                    match line.trim() {
                        "s" => self.session.start_game(&mut rand::rng())?,
                        "c" => {
                            self.session.scramble_display(&mut rand::rng());
                            self.print_study_cards();
                        }
                        "h" => {
                            self.session.toggle_commands_hidden();
                            self.print_study_cards();
                        }
                        "e" => {
                            self.session.toggle_explanations_hidden();
                            self.print_study_cards();
                        }
                        "x" => {
                            self.session.cancel_pregame();
                            println!("auto-start cancelled");
                        }
                        "q" => self.session.enter(Screen::ModeSelect, &mut rand::rng())?,
                        _ => {}
                    }
                }
                _ = ticker.tick() => {
                    match self.session.tick_pregame(&mut rand::rng()) {
                        PreGameTick::Counting(left) => println!("starting in {left}s..."),
                        PreGameTick::Started => println!("go!"),
                        PreGameTick::Idle => {}
                    }
                }
            }
        }
        Ok(())
    }

    fn print_study_cards(&self) {
        println!();
        println!("--- study the cards (round {}) ---", self.session.round_number());
        for (i, card) in self.session.display_cards().iter().enumerate() {
            let command = if self.session.commands_hidden() {
                "???"
            } else {
                card.command.as_str()
            };
            let description = if self.session.explanations_hidden() {
                "???"
            } else {
                card.description.as_str()
            };
            println!("  {:>2}. {command:<12} {description}", i + 1);
        }
    }

    async fn concentration(&mut self) -> anyhow::Result<()> {
        while self.session.screen() == Screen::Concentration {
            self.print_board();
            println!("  flip a card by number, or q) back");
            prompt();

            let line = self.read_line().await?;
            if line == "q" {
                self.session.enter(Screen::ModeSelect, &mut rand::rng())?;
                break;
            }
            let Ok(number) = line.parse::<usize>() else {
                println!("enter a card number");
                continue;
            };
            if number == 0 {
                println!("cards are numbered from 1");
                continue;
            }

            match self.session.flip(number - 1) {
                FlipResult::Rejected(rejection) => println!("  {}", describe_rejection(rejection)),
                FlipResult::FirstUp => self.print_board(),
                FlipResult::Evaluated {
                    outcome,
                    positions,
                    resolve_after,
                } => {
                    self.print_board();
                    match outcome {
                        MatchOutcome::Match => println!("  match!"),
                        MatchOutcome::Mismatch => println!(
                            "  no match ({} / {})",
                            positions[0] + 1,
                            positions[1] + 1
                        ),
                    }
                    tokio::time::sleep(resolve_after).await;
                    if let Some(Resolution::RoundComplete(summary)) = self.session.resolve_flips() {
                        self.celebrate(summary.round_number, summary.score, summary.attempts)
                            .await?;
                    }
                }
            }
        }
        Ok(())
    }

    async fn celebrate(&mut self, round: u32, score: u32, attempts: u32) -> anyhow::Result<()> {
        println!();
        println!("*** round {round} complete! score {score}, {attempts} attempts ***");
        println!("  a) play this round again   n) next round   q) back to menu");
        prompt();

        loop {
            match self.read_line().await?.as_str() {
                "a" => {
                    self.session.restart_round(&mut rand::rng())?;
                    return Ok(());
                }
                "n" => {
                    self.session.next_round(&mut rand::rng())?;
                    return Ok(());
                }
                "q" => {
                    self.session.enter(Screen::ModeSelect, &mut rand::rng())?;
                    return Ok(());
                }
                _ => println!("a, n or q"),
            }
        }
    }

    fn print_board(&self) {
        let Some(board) = self.session.board() else {
            return;
        };
        let state = board.state();
        println!();
        println!(
            "--- round {} | score {} | attempts {} ---",
            state.round_number, state.score, state.attempts
        );
        for (i, card) in board.cards().iter().enumerate() {
            let face = if card.matched {
                format!("[{}]", card.face_text())
            } else if board.is_face_up(i) {
                format!(" {} ", card.face_text())
            } else {
                format!(" #{} ", i + 1)
            };
            print!("{face:<20}");
            if (i + 1) % 4 == 0 {
                println!();
            }
        }
        println!();
    }

    async fn listen(&mut self) -> anyhow::Result<()> {
        let mut client = match OpenAiClient::new(&self.session.settings().openai_api_key) {
            Ok(client) => Some(client),
            Err(error) => {
                println!("audio unavailable: {error}");
                println!("set the API key under settings to enable speech and explanations.");
                None
            }
        };
        let mut sink = FileSink::new(std::env::temp_dir().join("sqlcards-audio"));

        while self.session.screen() == Screen::Listen {
            println!();
            println!("--- listen & learn ---");
            for (i, card) in self.session.display_cards().iter().enumerate() {
                println!("  {:>2}. {:<12} {}", i + 1, card.command, card.description);
            }
            println!("  <n> speak card   e <n>) explain card   a) play all   c) scramble   q) back");
            prompt();

            let line = self.read_line().await?;
            if line == "q" {
                if let Some(client) = client.as_mut() {
                    client.clear_cache();
                }
                self.session.enter(Screen::ModeSelect, &mut rand::rng())?;
                break;
            }
            if line == "c" {
                self.session.scramble_display(&mut rand::rng());
                continue;
            }
            if line == "a" {
                let Some(client) = client.as_mut() else {
                    println!("no API key configured");
                    continue;
                };
                let cards: Vec<_> = self
                    .session
                    .display_cards()
                    .into_iter()
                    .cloned()
                    .collect();
                let cancel = Arc::new(AtomicBool::new(false));
                let watcher = {
                    let cancel = Arc::clone(&cancel);
                    tokio::spawn(async move {
                        if tokio::signal::ctrl_c().await.is_ok() {
                            cancel.store(true, Ordering::SeqCst);
                        }
                    })
                };
                println!("playing all cards (ctrl-c to stop)...");
                let result = play_all(
                    &cards,
                    self.session.settings(),
                    client,
                    &mut sink,
                    &cancel,
                )
                .await;
                watcher.abort();
                match result {
                    Ok(played) => println!("played {played} cards"),
                    Err(error) => println!("playback stopped: {error}"),
                }
                continue;
            }
            if let Some(rest) = line.strip_prefix("e ") {
                let Some(card) = self.card_by_display_number(rest) else {
                    println!("no such card");
                    continue;
                };
                let Some(client) = client.as_ref() else {
                    println!("no API key configured");
                    continue;
                };
                println!("asking about {}...", card.command);
                match client.explain(&card).await {
                    Ok(text) => println!("{}", render_markdown(&text)),
                    Err(error) => println!("explanation failed: {error}"),
                }
                continue;
            }
            if let Some(card) = self.card_by_display_number(&line) {
                let Some(client) = client.as_mut() else {
                    println!("no API key configured");
                    continue;
                };
                let text = crate::audio::speech_text(&card, self.session.settings());
                if text.is_empty() {
                    println!("both speech toggles are off; nothing to say");
                    continue;
                }
                match client.synthesize(&text).await {
                    Ok(clip) => {
                        if let Err(error) = sink.play(&card.command, &clip) {
                            println!("playback failed: {error}");
                        }
                    }
                    Err(error) => println!("speech failed: {error}"),
                }
            } else {
                println!("unknown option '{line}'");
            }
        }
        Ok(())
    }

    fn card_by_display_number(&self, text: &str) -> Option<sqlcards_core::Card> {
        let number: usize = text.trim().parse().ok()?;
        self.session
            .display_cards()
            .get(number.checked_sub(1)?)
            .map(|&card| card.clone())
    }

    async fn practice(&mut self) -> anyhow::Result<()> {
        while self.session.screen() == Screen::Practice {
            let Some(card) = self.session.practice_card().cloned() else {
                if let Some(summary) = self.session.practice().and_then(|p| p.summary()) {
                    println!();
                    println!(
                        "practice complete: {} correct, {} incorrect",
                        summary.correct, summary.incorrect
                    );
                }
                self.session.enter(Screen::ModeSelect, &mut rand::rng())?;
                break;
            };

            let (done, total) = self.session.practice().map(|p| p.progress()).unwrap_or((0, 0));
            println!();
            println!("--- practice {}/{total} ---", done + 1);
            println!("  {}", card.description);
            println!("  type the command (or: hint, skip, q)");
            prompt();

            let line = self.read_line().await?;
            match line.as_str() {
                "q" => {
                    self.session.enter(Screen::ModeSelect, &mut rand::rng())?;
                    break;
                }
                "hint" => println!("  hint: {}", sqlcards_core::command_hint(&card.command)),
                "skip" => {
                    println!("  skipped (it was {})", card.command);
                    self.session.skip_practice();
                }
                answer => {
                    let Some(grade) = self.session.grade_practice(answer) else {
                        continue;
                    };
                    let advance_after = match grade {
                        PracticeGrade::Correct { advance_after } => {
                            println!("  correct!");
                            advance_after
                        }
                        PracticeGrade::Incorrect { advance_after } => {
                            println!("  not quite, it was {}", card.command);
                            advance_after
                        }
                    };
                    tokio::time::sleep(advance_after).await;
                    self.session.advance_practice();
                }
            }
        }
        Ok(())
    }

    async fn timed(&mut self) -> anyhow::Result<()> {
        let mut ticker = tokio::time::interval(Duration::from_secs(1));
        ticker.tick().await;

        while self.session.screen() == Screen::Timed {
            let Some(card) = self.session.timed_card().cloned() else {
                if let Some(summary) = self.session.timed().and_then(|t| t.summary()) {
                    println!();
                    println!("time's up! final score: {}", summary.score);
                }
                self.session.enter(Screen::ModeSelect, &mut rand::rng())?;
                break;
            };

            let remaining = self
                .session
                .timed()
                .and_then(|t| t.remaining_seconds())
                .unwrap_or(0);
            let score = self.session.timed().map(|t| t.score()).unwrap_or(0);
            println!();
            println!("--- timed | score {score} | {remaining}s ---");
            println!("  do you know: {} ?", card.description);
            println!("  y) I know it   n) I don't   q) back");

            // One prompt per card; ticks drain silently between answers.
            let mut answered = false;
            while !answered && self.session.screen() == Screen::Timed {
                tokio::select! {
                    line = self.input.next_line() => {
                        let line = line.context("reading from stdin")?.unwrap_or_else(|| "q".to_string());
                        match line.trim() {
                            "y" => {
                                if let TimedAnswer::Scored(points) = self.session.timed_thumbs_up() {
                                    println!("  it was {} (+{points})", card.command);
                                }
                                answered = true;
                            }
                            "n" => {
                                if let TimedAnswer::Scored(_) = self.session.timed_thumbs_down() {
                                    println!("  it was {}", card.command);
                                }
                                answered = true;
                            }
                            "q" => {
                                self.session.enter(Screen::ModeSelect, &mut rand::rng())?;
                            }
                            _ => {}
                        }
                    }
                    _ = ticker.tick() => {
                        match self.session.tick_timed() {
                            TimedTick::Counting(left) => println!("  {left}s..."),
                            TimedTick::TimedOut => {
                                println!("  too slow! it was {}", card.command);
                                answered = true;
                            }
                            TimedTick::Idle => answered = true,
                        }
                    }
                }
            }
        }
        Ok(())
    }

    async fn drag_drop(&mut self) -> anyhow::Result<()> {
        // Zones are the descriptions in a fixed scrambled order; items are
        // the commands in deck order. Both sides key off the card id.
        let cards: Vec<_> = self.session.deck().cards().to_vec();
        let mut zone_order: Vec<usize> = (0..cards.len()).collect();
        fisher_yates(&mut zone_order, &mut rand::rng());

        while self.session.screen() == Screen::DragDrop {
            let Some(dd) = self.session.drag_drop() else {
                break;
            };
            println!();
            println!(
                "--- drag & drop | {}/{} placed | {} attempts ---",
                dd.placed_count(),
                dd.item_count(),
                dd.attempts()
            );
            println!("commands:");
            for (i, card) in cards.iter().enumerate() {
                if dd.is_placed(&card.id) {
                    println!("  {:>2}. [placed]", i + 1);
                } else {
                    println!("  {:>2}. {}", i + 1, card.command);
                }
            }
            println!("descriptions:");
            for (i, &index) in zone_order.iter().enumerate() {
                println!("   {}. {}", zone_label(i), cards[index].description);
            }
            println!("  match with: <number> <letters>   q) back");
            prompt();

            let line = self.read_line().await?;
            if line == "q" {
                self.session.enter(Screen::ModeSelect, &mut rand::rng())?;
                break;
            }

            let mut parts = line.split_whitespace();
            let item = parts
                .next()
                .and_then(|p| p.parse::<usize>().ok())
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| cards.get(i));
            let zone = parts
                .next()
                .and_then(zone_index)
                .and_then(|i| zone_order.get(i))
                .and_then(|&i| cards.get(i));
            let (Some(item), Some(zone)) = (item, zone) else {
                println!("enter a command number and a description letter");
                continue;
            };

            match self.session.drop_item(&item.id, &zone.id) {
                DropOutcome::Placed { complete: true } => {
                    let dd = self.session.drag_drop();
                    println!(
                        "all matched in {} attempts!",
                        dd.map(|d| d.attempts()).unwrap_or(0)
                    );
                    self.session.enter(Screen::ModeSelect, &mut rand::rng())?;
                }
                DropOutcome::Placed { complete: false } => println!("  placed!"),
                DropOutcome::Wrong => println!("  not a match"),
                DropOutcome::AlreadyPlaced => println!("  that one is already placed"),
                DropOutcome::UnknownItem => println!("  no such card"),
            }
        }
        Ok(())
    }

    async fn settings_menu(&mut self) -> anyhow::Result<()> {
        let settings = self.session.settings();
        println!();
        println!("--- settings ---");
        println!("  1) auto-advance: {}", settings.auto_advance);
        println!("  2) auto-start timer: {}s", settings.timer_duration);
        println!(
            "  3) speak explanation: {}",
            settings.listen_speak_explanation
        );
        println!("  4) speak example: {}", settings.listen_speak_example);
        println!(
            "  5) OpenAI API key: {}",
            if settings.openai_api_key.is_empty() {
                "(not set)"
            } else {
                "(set)"
            }
        );
        println!("  pick a number to change it, or q");
        prompt();

        let choice = self.read_line().await?;
        let update = match choice.as_str() {
            "1" => SettingsUpdate {
                auto_advance: Some(!self.session.settings().auto_advance),
                ..Default::default()
            },
            "2" => {
                println!("seconds before auto-start:");
                let Ok(seconds) = self.read_line().await?.parse::<u32>() else {
                    println!("not a number");
                    return Ok(());
                };
                SettingsUpdate {
                    timer_duration: Some(seconds),
                    ..Default::default()
                }
            }
            "3" => SettingsUpdate {
                listen_speak_explanation: Some(!self.session.settings().listen_speak_explanation),
                ..Default::default()
            },
            "4" => SettingsUpdate {
                listen_speak_example: Some(!self.session.settings().listen_speak_example),
                ..Default::default()
            },
            "5" => {
                println!("paste the API key:");
                SettingsUpdate {
                    openai_api_key: Some(self.read_line().await?),
                    ..Default::default()
                }
            }
            _ => return Ok(()),
        };

        self.session.update_settings(update);
        if let Some(path) = &self.settings_path {
            if let Err(error) = store::save(path, self.session.settings()) {
                tracing::warn!(%error, "failed to persist settings");
            }
        }
        println!("saved");
        Ok(())
    }

    async fn library_menu(&mut self) -> anyhow::Result<()> {
        let Some(library) = load_library(&self.deck_dir.join("index.json")) else {
            println!("no deck library found in {}", self.deck_dir.display());
            return Ok(());
        };

        println!();
        println!("--- deck library ---");
        for (i, entry) in library.decks.iter().enumerate() {
            let difficulty = entry.difficulty.as_deref().unwrap_or("-");
            println!(
                "  {:>2}. {} ({} cards, {difficulty})",
                i + 1,
                entry.name,
                entry.card_count
            );
        }
        println!("  pick a deck, or q");
        prompt();

        let choice = self.read_line().await?;
        let Some(entry) = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| library.decks.get(i))
        else {
            return Ok(());
        };

        let deck = load_deck(&self.deck_dir.join(&entry.filename));
        println!("loaded '{}' with {} cards", entry.name, deck.len());
        self.session.replace_deck(deck);
        Ok(())
    }

    /// Import a deck file by path. Strict: on any error the current deck
    /// stays active.
    async fn import_deck(&mut self) -> anyhow::Result<()> {
        println!("path to the deck file:");
        prompt();
        let path = PathBuf::from(self.read_line().await?);
        match read_deck(&path) {
            Ok(deck) if !deck.is_empty() => {
                println!("imported {} cards", deck.len());
                self.session.replace_deck(deck);
            }
            Ok(_) => println!("that file has no cards; keeping the current deck"),
            Err(error) => println!("import failed ({error}); keeping the current deck"),
        }
        Ok(())
    }
}

fn prompt() {
    print!("> ");
    // stdout is line-buffered; flush so the prompt shows before input.
    let _ = std::io::stdout().flush();
}

/// Spreadsheet-style zone label: `a..z`, then `aa`, `ab`, and so on, so
/// decks with more than 26 cards still get a label per drop zone.
fn zone_label(mut index: usize) -> String {
    let mut label = String::new();
    loop {
        label.insert(0, (b'a' + (index % 26) as u8) as char);
        index /= 26;
        if index == 0 {
            break;
        }
        index -= 1;
    }
    label
}

/// Inverse of [`zone_label`]. `None` for anything but lowercase letters.
fn zone_index(label: &str) -> Option<usize> {
    if label.is_empty() {
        return None;
    }
    let mut index = 0usize;
    for c in label.chars() {
        if !c.is_ascii_lowercase() {
            return None;
        }
        index = index * 26 + (c as usize - 'a' as usize + 1);
    }
    Some(index - 1)
}

fn describe_rejection(rejection: FlipRejection) -> &'static str {
    match rejection {
        FlipRejection::RoundInactive => "the round is over",
        FlipRejection::PairPending => "wait for the pair to resolve",
        FlipRejection::OutOfBounds => "no card there",
        FlipRejection::AlreadySelected => "that card is already face up",
        FlipRejection::AlreadyMatched => "that card is already matched",
    }
}
