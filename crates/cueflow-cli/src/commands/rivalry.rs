use std::io::{self, BufRead, Write};

use chrono::Utc;
use clap::Subcommand;
use cueflow_core::game::Player;
use cueflow_core::rivalry::Rivalry;

use super::open_store;

#[derive(Subcommand)]
pub enum RivalryAction {
    /// List rivalries, most recently played first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one rivalry
    Show {
        /// Rivalry ID
        id: String,
    },
    /// Delete a rivalry
    Delete {
        /// Rivalry ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Delete all rivalries and reset settings
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn leader(rivalry: &Rivalry) -> String {
    let (p1, p2) = (rivalry.wins.player1, rivalry.wins.player2);
    match p1.cmp(&p2) {
        std::cmp::Ordering::Greater => format!("{} leads", rivalry.name_of(Player::Player1)),
        std::cmp::Ordering::Less => format!("{} leads", rivalry.name_of(Player::Player2)),
        std::cmp::Ordering::Equal => "level".to_string(),
    }
}

pub fn run(action: RivalryAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store()?;
    match action {
        RivalryAction::List { json } => {
            let rivalries = store.rivalries().sorted_by_last_played();
            if json {
                println!("{}", serde_json::to_string_pretty(&rivalries)?);
                return Ok(());
            }
            if rivalries.is_empty() {
                println!("No rivalries yet.");
                return Ok(());
            }
            let now = Utc::now();
            let active = store.rivalries().active_id();
            for r in rivalries {
                let marker = if Some(r.id.as_str()) == active { "*" } else { " " };
                println!(
                    "{marker} {}  {} vs {}  {}-{}  ({})  {}",
                    r.id,
                    r.player1_name,
                    r.player2_name,
                    r.wins.player1,
                    r.wins.player2,
                    r.game_mode.label(),
                    r.last_played_label(now),
                );
            }
        }
        RivalryAction::Show { id } => {
            let Some(r) = store.rivalries().get(&id) else {
                eprintln!("rivalry not found: {id}");
                std::process::exit(1);
            };
            println!("{} vs {} ({})", r.player1_name, r.player2_name, r.game_mode.label());
            println!("  Wins:         {}-{} ({})", r.wins.player1, r.wins.player2, leader(r));
            println!("  Games played: {}", r.total_games_played);
            println!("  Created:      {}", r.created_at.format("%Y-%m-%d %H:%M"));
            println!("  Last played:  {}", r.last_played_label(Utc::now()));
        }
        RivalryAction::Delete { id, yes } => {
            if store.rivalries().get(&id).is_none() {
                eprintln!("rivalry not found: {id}");
                std::process::exit(1);
            }
            store.request_delete_rivalry(&id);
            if !yes && !confirm(&format!("Delete rivalry {id}?"))? {
                store.cancel_delete_rivalry();
                println!("cancelled");
                return Ok(());
            }
            store.confirm_delete_rivalry()?;
            println!("rivalry deleted: {id}");
        }
        RivalryAction::Clear { yes } => {
            store.request_clear_all();
            if !yes && !confirm("Delete all rivalries and reset settings?")? {
                store.cancel_clear_all();
                println!("cancelled");
                return Ok(());
            }
            store.confirm_clear_all()?;
            println!("all data cleared");
        }
    }
    Ok(())
}
