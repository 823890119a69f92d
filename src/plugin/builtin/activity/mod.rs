//! Activity tracking plugin
//!
//! Records every group message into the aggregator, then answers the
//! `/activity.*` commands. It registers through the standard contract like
//! any other plugin; recording works by observing messages and falling
//! through as unhandled, so the rest of the chain still sees them.
//!
//! Commands (group chat only):
//! - `/activity.report [days]` — summary over the last `days` days (1-30)
//! - `/activity.user <id>` — per-day counts for one member
//! - `/activity.trend` — hourly distribution across the retained window

pub mod aggregator;

pub use aggregator::{ActivityAggregator, ActivityReport, DailyStat};

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

use crate::event::api::MessageEvent;
use crate::plugin::context::BotContext;
use crate::plugin::error::PluginResult;
use crate::plugin::traits::BotPlugin;
use crate::plugin::types::PluginInfo;

const DEFAULT_REPORT_DAYS: u32 = 7;
const MAX_REPORT_DAYS: u32 = 30;

pub struct ActivityPlugin {
    ctx: Arc<BotContext>,
    aggregator: Arc<ActivityAggregator>,
    sweep_interval: Duration,
}

impl ActivityPlugin {
    pub fn new(ctx: Arc<BotContext>) -> Self {
        let activity = &ctx.config.activity;
        let aggregator = Arc::new(ActivityAggregator::new(activity.retention_days));
        let sweep_interval = activity.sweep_interval();
        Self {
            ctx,
            aggregator,
            sweep_interval,
        }
    }

    /// Shared handle to the underlying aggregator
    pub fn aggregator(&self) -> Arc<ActivityAggregator> {
        Arc::clone(&self.aggregator)
    }

    fn render(&self, group_id: i64, command: &str, args: &str) -> Option<String> {
        match command {
            "activity.report" => {
                let days = args
                    .split_whitespace()
                    .next()
                    .and_then(|arg| arg.parse::<u32>().ok())
                    .unwrap_or(DEFAULT_REPORT_DAYS)
                    .clamp(1, MAX_REPORT_DAYS);
                let report = self.aggregator.report(group_id, days, Utc::now().date_naive());
                Some(render_report(&report))
            }
            "activity.user" => match args.split_whitespace().next().map(str::parse::<i64>) {
                Some(Ok(user_id)) => {
                    let per_day = self.aggregator.user_activity(group_id, user_id);
                    Some(render_user_activity(user_id, &per_day))
                }
                _ => Some("usage: /activity.user <numeric user id>".to_string()),
            },
            "activity.trend" => {
                let trend = self.aggregator.trend(group_id);
                Some(render_trend(group_id, &trend))
            }
            other if other.starts_with("activity.") => Some(format!(
                "unknown activity command '{}'; available: report, user, trend",
                other.trim_start_matches("activity.")
            )),
            _ => None,
        }
    }
}

#[async_trait::async_trait]
impl BotPlugin for ActivityPlugin {
    fn info(&self) -> PluginInfo {
        PluginInfo {
            id: "activity".to_string(),
            name: "ActivityTracker".to_string(),
            priority: 10,
        }
    }

    async fn setup(&mut self) -> PluginResult<()> {
        let aggregator = Arc::clone(&self.aggregator);
        let period = self.sweep_interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately; skip it so the sweep
            // runs on the configured cadence.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                aggregator.sweep(Utc::now().date_naive());
            }
        });
        log::info!(
            "activity sweeper running every {:?}, retention {} days",
            period,
            self.aggregator.retention_days()
        );
        Ok(())
    }

    async fn handle_message(&self, event: &MessageEvent) -> PluginResult<bool> {
        // Private chats are excluded from group aggregation by design.
        let Some(group_id) = event.group_id() else {
            return Ok(false);
        };

        self.aggregator
            .record(group_id, event.user_id, event.content_kind(), event.time);

        let Some(command) = event.command.as_deref() else {
            return Ok(false);
        };
        let Some(reply) = self.render(group_id, command, &event.command_args()) else {
            return Ok(false);
        };

        if let Err(e) = self.ctx.gateway.send_group_msg(group_id, &reply).await {
            log::warn!("activity reply to group {} failed: {}", group_id, e);
        }
        Ok(true)
    }
}

fn render_report(report: &ActivityReport) -> String {
    let mut out = format!(
        "Activity for group {} over the last {} day(s)",
        report.group_id, report.days
    );
    if report.truncated {
        out.push_str(" (window clamped to retention)");
    }
    out.push('\n');
    out.push_str(&format!(
        "total messages: {}\nactive users: {}\n",
        report.total_messages, report.active_users
    ));

    if !report.top_users.is_empty() {
        out.push_str("\nmost active users:\n");
        for (rank, (user, count)) in report.top_users.iter().enumerate() {
            out.push_str(&format!("{}. {} - {} message(s)\n", rank + 1, user, count));
        }
    }

    if !report.kinds.is_empty() {
        out.push_str("\nmessage types:\n");
        let total: u32 = report.kinds.iter().map(|(_, count)| count).sum();
        for (kind, count) in &report.kinds {
            let share = if total > 0 {
                f64::from(*count) / f64::from(total) * 100.0
            } else {
                0.0
            };
            out.push_str(&format!("- {}: {} ({:.1}%)\n", kind, count, share));
        }
    }

    if let Some((hour, count)) = report.peak_hours.first() {
        out.push_str(&format!(
            "\npeak hour: {:02}:00-{:02}:00 with {} message(s)\n",
            hour,
            (hour + 1) % 24,
            count
        ));
    }

    out.push_str("\nper day:\n");
    for stat in &report.daily {
        out.push_str(&format!(
            "{}: {} message(s), {} user(s)\n",
            stat.date, stat.messages, stat.active_users
        ));
    }
    out
}

fn render_user_activity(user_id: i64, per_day: &[(chrono::NaiveDate, u32)]) -> String {
    if per_day.is_empty() {
        return format!("user {} has no recorded activity in this group", user_id);
    }
    let total: u32 = per_day.iter().map(|(_, count)| count).sum();
    let mut out = format!(
        "activity for user {}: {} message(s) over {} day(s)\n",
        user_id,
        total,
        per_day.len()
    );
    for (date, count) in per_day {
        out.push_str(&format!("{}: {} message(s)\n", date, count));
    }
    out
}

fn render_trend(group_id: i64, trend: &[(u32, u32)]) -> String {
    let total: u32 = trend.iter().map(|(_, count)| count).sum();
    if total == 0 {
        return format!("no recorded activity for group {} yet", group_id);
    }
    let mut out = format!("hourly activity for group {}:\n", group_id);
    for (hour, count) in trend {
        if *count > 0 {
            out.push_str(&format!("{:02}:00 - {} message(s)\n", hour, count));
        }
    }
    out
}
