//! Line-oriented driver rendering the session state to stdout.

use std::io::Write as _;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use valdeck_session::{DashboardSession, DetailView, ReportPhase, ReportSession, Screen};
use valdeck_shared::stats::format_ratio;
use valdeck_update_poller::{OnSyncComplete, UpdatePhase, UpdatePoller};

use crate::error::AppError;

/// Bridges the poller completion hook back onto the session.
pub struct SessionRefresh(pub Arc<DashboardSession>);

#[async_trait]
impl OnSyncComplete for SessionRefresh {
    async fn refresh(&self) {
        self.0.refresh_matches().await;
    }
}

pub struct Cli {
    session: Arc<DashboardSession>,
    report: Arc<ReportSession>,
    poller: Arc<UpdatePoller>,
}

impl Cli {
    pub fn new(
        session: Arc<DashboardSession>,
        report: Arc<ReportSession>,
        poller: Arc<UpdatePoller>,
    ) -> Self {
        Self {
            session,
            report,
            poller,
        }
    }

    pub async fn run(&self) -> Result<(), AppError> {
        println!("valdeck: enter a riot id as name#tag, or `quit`.");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            self.prompt();
            let Some(line) = lines.next_line().await? else {
                break;
            };
            let input = line.trim();
            if input.is_empty() {
                continue;
            }
            if input == "quit" {
                break;
            }

            match self.session.state().screen {
                Screen::Landing => self.handle_landing(input).await,
                Screen::Profile => self.handle_profile(input).await,
            }
        }

        Ok(())
    }

    fn prompt(&self) {
        let tag = match self.session.state().screen {
            Screen::Landing => "search",
            Screen::Profile => "profile",
        };
        print!("{tag}> ");
        let _ = std::io::stdout().flush();
    }

    async fn handle_landing(&self, input: &str) {
        if self.session.search(input).await {
            self.render_profile();
        } else if let Some(message) = self.session.state().search_error {
            println!("{message}");
        }
    }

    async fn handle_profile(&self, input: &str) {
        match input {
            "back" => {
                self.session.back_to_landing();
                println!("back on the landing screen.");
            }
            "list" => self.render_profile(),
            "update" => self.run_update().await,
            "report" => self.run_report().await,
            _ => {
                if let Some(index) = input.strip_prefix("open ") {
                    self.open_match(index.trim()).await;
                } else {
                    println!("commands: open <n> | list | update | report | back | quit");
                }
            }
        }
    }

    async fn open_match(&self, index: &str) {
        let matches = self.session.state().matches;
        let Some(row) = index
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|n| matches.get(n))
        else {
            println!("no such match row.");
            return;
        };

        self.session.open_match(row.match_id.clone()).await;
        self.render_detail();
        // The detail is discarded as soon as the view closes.
        self.session.close_match();
    }

    fn render_profile(&self) {
        let state = self.session.state();
        let Some(player) = state.player else {
            return;
        };
        let stats = self.session.profile_stats();

        println!();
        println!(
            "{} | {} matches, {}% win rate ({}W / {}L)",
            player.display_name(),
            stats.total_matches,
            stats.win_rate,
            stats.wins,
            stats.losses,
        );
        println!(
            "K/D {}  HS {}%  ADR {}  ACS {}  MVPs {}",
            format_ratio(stats.avg_kd),
            stats.avg_hs,
            stats.avg_adr,
            stats.avg_acs,
            stats.mvp_count,
        );

        if state.matches.is_empty() {
            println!("No matches found for this player.");
            return;
        }
        for (i, m) in state.matches.iter().enumerate() {
            println!(
                "{:>3}. {:<7} {:<9} {:>5}  {:<8} K/D {}  {}",
                i + 1,
                m.result.to_title_string(),
                m.map,
                m.to_formatted_score(),
                m.agent_name,
                format_ratio(m.kd_ratio),
                m.position_label,
            );
        }
    }

    fn render_detail(&self) {
        match self.session.state().detail {
            DetailView::Open(detail) => {
                println!();
                println!(
                    "{} | {} • {} rounds • winner: {} Team",
                    detail.map_name,
                    detail.to_formatted_duration(),
                    detail.rounds_played,
                    detail.winning_team,
                );
                for team in ["Blue", "Red"] {
                    println!("{team} Team");
                    for p in detail.team(team) {
                        println!(
                            "  {:<4} {:<10} {}#{}  {:>8}  ACS {:>3.0}  ADR {:>3.0}  HS {:.0}%",
                            p.position_label(),
                            p.agent_name,
                            p.user_id,
                            p.user_tag,
                            p.to_formatted_kda(),
                            p.acs(),
                            p.adr(),
                            p.hs_percent(),
                        );
                    }
                }
            }
            DetailView::NotFound => println!("Match not found"),
            DetailView::Loading | DetailView::Closed => {}
        }
    }

    async fn run_update(&self) {
        let Some(player) = self.session.state().player else {
            return;
        };

        self.poller
            .trigger(player.region.clone(), player.puuid.clone())
            .await;

        let mut last = None;
        loop {
            let progress = self.poller.progress();
            if progress.phase == UpdatePhase::Idle {
                break;
            }
            if last.as_ref() != Some(&progress) {
                println!("[{:>3}%] {}", progress.percent, progress.message);
                last = Some(progress);
            }
            tokio::time::sleep(Duration::from_millis(300)).await;
        }

        self.render_profile();
    }

    async fn run_report(&self) {
        let Some(player) = self.session.state().player else {
            return;
        };

        println!("Generating coach report...");
        let generating = tokio::spawn({
            let report = self.report.clone();
            let puuid = player.puuid.clone();
            async move { report.generate(puuid).await }
        });

        let mut printed = 0;
        loop {
            let state = self.report.state();
            if state.phase == ReportPhase::Failed {
                println!();
                println!("{}", state.text);
                break;
            }
            if state.text.len() > printed {
                print!("{}", &state.text[printed..]);
                let _ = std::io::stdout().flush();
                printed = state.text.len();
            }
            if state.phase == ReportPhase::Done {
                break;
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        let _ = generating.await;
        println!();
    }
}
