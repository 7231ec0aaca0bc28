use anyhow::{bail, Context, Result};
use drawpoker_core::{
    Card, Event, EventBus, Notice, Rank, SessionError, SessionRules, SessionState, SortOrder,
    Suit, WakeQueue,
};
use std::io::{self, BufRead, Write};
use std::thread;

#[derive(Debug, Clone, Copy, Default)]
struct CliOptions {
    seed: Option<u64>,
    /// Skip transition delays; useful for scripted play.
    fast: bool,
}

fn parse_args() -> Result<Option<CliOptions>> {
    let mut options = CliOptions::default();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                let value = args.next().context("--seed requires a value")?;
                options.seed = Some(value.parse().context("--seed expects an integer")?);
            }
            "--fast" => options.fast = true,
            "--help" | "-h" => {
                print_usage();
                return Ok(None);
            }
            other => bail!("unknown argument: {other}"),
        }
    }
    Ok(Some(options))
}

fn print_usage() {
    println!("usage: drawpoker-cli [--seed N] [--fast]");
    println!();
    print_help();
}

fn print_help() {
    println!("commands:");
    println!("  1..9          toggle selection of a card");
    println!("  p, play       play the selected cards (1-5)");
    println!("  d, discard    discard the selected cards (1-5)");
    println!("  s, sort       sort the hand by rank, toggling direction");
    println!("  state         dump the session state as JSON");
    println!("  h, help, ?    show this help");
    println!("  q, quit       leave the table");
}

fn main() -> Result<()> {
    env_logger::init();
    let Some(options) = parse_args()? else {
        return Ok(());
    };
    let seed = options.seed.unwrap_or_else(rand::random);
    log::info!("starting session with seed {seed}");

    let mut session = SessionState::new(SessionRules::default(), seed);
    let mut timers = WakeQueue::new();
    let mut events = EventBus::default();
    session.deal(&mut events)?;
    report_events(&mut events);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        render_table(&session);
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let command = line.trim();

        let outcome = match command {
            "" => Ok(()),
            "q" | "quit" | "exit" => break,
            "h" | "help" | "?" => {
                print_help();
                Ok(())
            }
            "state" => {
                println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
                Ok(())
            }
            "p" | "play" => session.play(&mut timers, &mut events),
            "d" | "discard" => session.discard(&mut timers, &mut events),
            "s" | "sort" => session.sort_toggle(&mut events),
            other => match other.parse::<usize>() {
                Ok(pos) if (1..=session.hand().len()).contains(&pos) => {
                    session.toggle_select(pos - 1, &mut events)
                }
                _ => {
                    println!("unknown command: {other} (try 'help')");
                    Ok(())
                }
            },
        };
        if let Err(err) = outcome {
            report_rejection(&err);
        }

        report_events(&mut events);
        drain_timers(&mut session, &mut timers, &mut events, options.fast);
    }
    println!("final score: {}", session.score());
    Ok(())
}

/// Waits out each scheduled delay (the animations of the original game),
/// then hands the wake back to the session. Wakes scheduled while draining
/// are picked up in the same pass.
fn drain_timers(
    session: &mut SessionState,
    timers: &mut WakeQueue,
    events: &mut EventBus,
    fast: bool,
) {
    while let Some((delay, wake)) = timers.pop() {
        if !fast {
            thread::sleep(delay);
        }
        session.wake(wake, timers, events);
        report_events(events);
    }
}

fn report_rejection(err: &SessionError) {
    match err {
        SessionError::Busy => log::debug!("action dropped: {err}"),
        _ => println!("{err}"),
    }
}

fn report_events(events: &mut EventBus) {
    for event in events.drain() {
        match event {
            Event::HandDealt { count } => log::debug!("{count} card(s) dealt"),
            Event::SelectionChanged { .. } => {}
            Event::DiscardStarted { count } => println!("discarding {count} card(s)..."),
            Event::CardsReplaced { replacements } => {
                for (old, new) in &replacements {
                    println!("  {} -> {}", card_str(*old), card_str(*new));
                }
            }
            Event::HandScored {
                kind,
                payout,
                card_points,
                total,
                winning,
                score,
            } => {
                let cards: Vec<String> = winning.iter().map(|card| card_str(*card)).collect();
                println!(
                    "{}! {payout} + {card_points} card points = {total} ({}), score {score}",
                    kind.label(),
                    cards.join(" ")
                );
            }
            Event::NoWin => println!("not a winning hand"),
            Event::HandSorted { order } => {
                let direction = match order {
                    SortOrder::Ascending => "ascending",
                    SortOrder::Descending => "descending",
                };
                println!("hand sorted {direction}");
            }
            Event::NoticeShown { notice } => match notice {
                Notice::DiscardsExhausted => println!("no discards left!"),
            },
            Event::NoticeCleared => {}
            Event::SessionEnded { score, won } => {
                if won {
                    println!("session over: you won with {score} points!");
                } else {
                    println!("session over: {score} points, better luck next time");
                }
            }
            Event::SessionReset => println!("--- new session ---"),
        }
    }
}

fn render_table(session: &SessionState) {
    let mut line = String::new();
    for (idx, card) in session.hand().iter().enumerate() {
        let marker = if session.selection().contains(&idx) {
            format!("[{}]", card_str(*card))
        } else {
            format!(" {} ", card_str(*card))
        };
        line.push_str(&format!("{}:{marker} ", idx + 1));
    }
    println!("{line}");
    println!(
        "score {} | hands {}/{} | discards {}/{} | deck {}",
        session.score(),
        session.hands_played(),
        session.rules().max_hands,
        session.discards_used(),
        session.rules().max_discards,
        session.deck_len(),
    );
}

fn card_str(card: Card) -> String {
    let rank = match card.rank {
        Rank::Jack => "J",
        Rank::Queen => "Q",
        Rank::King => "K",
        Rank::Ace => "A",
        other => other.id(),
    };
    let suit = match card.suit {
        Suit::Clubs => "♣",
        Suit::Diamonds => "♦",
        Suit::Hearts => "♥",
        Suit::Spades => "♠",
    };
    format!("{rank}{suit}")
}
