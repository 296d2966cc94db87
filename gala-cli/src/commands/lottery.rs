use chrono::Utc;
use comfy_table::{presets::UTF8_FULL, Table};
use gala_core::{App, Result};
use gala_lottery::{LotteryError, Phase, RevealEvent, RevealSession, Tier};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

pub async fn handle_lottery_command(app: &mut App, winners: usize, auto: bool) -> Result<()> {
    app.require_admin()?;
    if app.roster().is_empty() {
        app.load_cached().await?;
    }

    let minimum = app.config().lottery.minimum_donation;
    let session = match gala_lottery::run_lottery(app.roster(), minimum, winners) {
        Ok(session) => session,
        // input problems are messages, not crashes; back to the prompt
        Err(e @ LotteryError::InvalidCount)
        | Err(e @ LotteryError::NoEligibleParticipants)
        | Err(e @ LotteryError::TooManyWinners { .. }) => {
            println!("{}", e);
            return Ok(());
        }
        Err(e) => {
            return Err(gala_core::GalaError::internal(e.to_string()));
        }
    };

    println!(
        "Drawing {} of {} eligible donors (threshold {:.0} UAH)",
        session.winners().len(),
        session.eligible().len(),
        minimum
    );

    drive(session, auto).await;
    Ok(())
}

/// Run the reveal in the terminal: sleep until the session's next
/// deadline, or react to stdin (Enter reveals early, `q` cancels).
async fn drive(mut session: RevealSession, auto: bool) {
    let mut events = match session.start(Utc::now()) {
        Ok(events) => events,
        Err(e) => {
            println!("{}", e);
            return;
        }
    };
    render(&session, &events);

    let mut input = BufReader::new(tokio::io::stdin()).lines();

    while !session.is_closed() {
        let Some(deadline) = session.next_deadline() else {
            // nothing scheduled: either done revealing or waiting on us
            if session.is_revealed() {
                if !auto {
                    println!("\nPress Enter to finish");
                    let _ = input.next_line().await;
                }
                events = session.close();
                render(&session, &events);
            } else {
                events = session.close();
                render(&session, &events);
            }
            continue;
        };

        let wait = (deadline - Utc::now())
            .to_std()
            .unwrap_or(Duration::ZERO);

        if auto {
            tokio::time::sleep(wait).await;
            events = session.tick(Utc::now());
            render(&session, &events);
        } else {
            events = wait_for_tick_or_input(&mut session, wait, &mut input).await;
            render(&session, &events);
        }
    }
}

async fn wait_for_tick_or_input(
    session: &mut RevealSession,
    wait: Duration,
    input: &mut Lines<BufReader<Stdin>>,
) -> Vec<RevealEvent> {
    tokio::select! {
        _ = tokio::time::sleep(wait) => session.tick(Utc::now()),
        line = input.next_line() => match line {
            Ok(Some(l)) if l.trim().eq_ignore_ascii_case("q") => session.close(),
            Ok(Some(_)) => session.trigger_reveal(Utc::now()),
            _ => session.close(),
        },
    }
}

fn render(session: &RevealSession, events: &[RevealEvent]) {
    for event in events {
        match event {
            RevealEvent::PhaseChanged { to, .. } => render_phase(session, *to),
            RevealEvent::CardFlipped { index } => {
                let w = &session.winners()[*index];
                println!(
                    "  Card {}: {} - {:.0} UAH",
                    index + 1,
                    w.full_name(),
                    w.donation
                );
            }
            RevealEvent::Celebration => println!("\n🎉 Congratulations!"),
        }
    }
}

fn render_phase(session: &RevealSession, to: Phase) {
    match to {
        Phase::Scrolling => {
            println!("\n🎯 Prize draw");
            let names = session.scroll_names();
            println!("  Rolling: {} ...", names[..names.len().min(6)].join(", "));
            if session.tier() == Tier::Small {
                println!("  {} face-down cards on the table", session.winners().len());
            }
            println!("  (Enter to reveal, q to cancel)");
        }
        Phase::PreCountdown => {
            println!("\n🎯 Prize draw");
            let items = session.carousel_items();
            println!("  Carousel: {} ...", items[..items.len().min(6)].join(", "));
            println!("  (Enter to start the countdown, q to cancel)");
        }
        Phase::Counting(n) => println!("  {}...", n),
        Phase::Revealed => {
            if session.tier() == Tier::Single {
                let w = &session.winners()[0];
                println!("\n👑 Winner: {}", w.full_name());
                println!("   Donated {:.0} UAH", w.donation);
            }
        }
        Phase::ListRevealed => {
            println!("\n🏆 Winners:");
            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["#", "Name", "Surname", "Donation"]);
            for (i, w) in session.winners().iter().enumerate() {
                table.add_row(vec![
                    (i + 1).to_string(),
                    w.name.clone(),
                    w.surname.clone(),
                    format!("{:.0}", w.donation),
                ]);
            }
            println!("{}", table);
        }
        Phase::Closed => println!("Draw complete"),
        Phase::Idle => {}
    }
}
