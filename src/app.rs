use std::io::BufRead;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use chrono::{Days, NaiveDate, Utc};

use crate::api::AnalyticsClient;
use crate::cli::{CategoriesArgs, Cli, Commands, RangeArgs, TodayArgs};
use crate::consts::AGGREGATION_DAYS;
use crate::core::{
    AggregationWindow, DailyStat, DailyStatRecord, ReconciliationResult, RefreshGate, Ticket,
    aggregate_days, reconcile,
};
use crate::error::AppError;
use crate::output::{
    NumberFormat, StatTableOptions, output_category_json, output_overview_json,
    output_range_json, output_today_json, print_category_table, print_overview_table,
    print_range_table, print_today_table,
};
use crate::utils::{Timezone, parse_date};

/// Time the backend gets to finish generating before today's stats are read
const GENERATE_SETTLE: Duration = Duration::from_secs(1);

pub(crate) struct CommandContext<'a> {
    pub(crate) cli: &'a Cli,
    pub(crate) client: AnalyticsClient,
    pub(crate) timezone: Timezone,
    pub(crate) number_format: NumberFormat,
}

impl CommandContext<'_> {
    fn table_options(&self) -> StatTableOptions {
        StatTableOptions {
            order: self.cli.order,
            use_color: self.cli.use_color(),
            number_format: self.number_format,
        }
    }
}

fn normalize_all(records: Vec<DailyStatRecord>, fallback_date: NaiveDate) -> Vec<DailyStat> {
    records
        .into_iter()
        .map(|r| r.normalize(fallback_date))
        .collect()
}

/// Today's record, always dated with the client's calendar day.
///
/// The backend may echo a UTC timestamp or a stale day; the fallback window
/// must still end on `today`.
fn today_stat(record: DailyStatRecord, today: NaiveDate) -> DailyStat {
    DailyStat {
        date: today,
        ..record.normalize(today)
    }
}

/// Generation failures only cost freshness, so they are logged and skipped
fn trigger_generation(client: &AnalyticsClient) {
    match client.generate() {
        Ok(()) => {
            tracing::debug!("analytics generation triggered");
            thread::sleep(GENERATE_SETTLE);
        }
        Err(e) => tracing::warn!(error = %e, "analytics generation failed, using existing data"),
    }
}

/// Fetch today's record and reconcile it against the trailing window
pub(crate) fn load_today(
    client: &AnalyticsClient,
    timezone: Timezone,
    generate: bool,
) -> Result<ReconciliationResult, AppError> {
    let today = timezone.today();
    if generate {
        trigger_generation(client);
    }

    let stat = today_stat(client.daily(today)?, today);
    let result = reconcile(stat, |start: NaiveDate, end: NaiveDate| {
        let window = AggregationWindow { start, end };
        client
            .range_page(window, 0, i64::from(AGGREGATION_DAYS))
            .map(|page| normalize_all(page.content, end))
    })?;
    tracing::debug!(source = result.source.as_str(), "reconciled daily stats");
    Ok(result)
}

fn render_today(result: &ReconciliationResult, ctx: &CommandContext<'_>, refreshed_at: Option<&str>) {
    if ctx.cli.json {
        println!("{}", output_today_json(result, refreshed_at));
    } else {
        if let Some(at) = refreshed_at {
            println!("\n  Refreshed at {at}");
        }
        print_today_table(result, ctx.table_options());
    }
}

fn handle_today(args: &TodayArgs, ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let generate = !(args.no_generate || ctx.cli.config_no_generate);
    match args.watch {
        Some(secs) => watch_today(ctx, generate, Duration::from_secs(secs)),
        None => {
            let result = load_today(&ctx.client, ctx.timezone, generate)?;
            render_today(&result, ctx, None);
            Ok(())
        }
    }
}

enum WatchEvent {
    RefreshRequested,
    Finished(Ticket, Result<ReconciliationResult, AppError>),
}

/// Re-run today's reconciliation on a timer and on Enter.
///
/// Every refresh runs on its own thread, so responses can arrive out of
/// order; the gate drops any response older than one already shown.
fn watch_today(ctx: &CommandContext<'_>, generate: bool, interval: Duration) -> Result<(), AppError> {
    let gate = RefreshGate::default();
    let (tx, rx) = mpsc::channel::<WatchEvent>();

    let stdin_tx = tx.clone();
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            if line.is_err() || stdin_tx.send(WatchEvent::RefreshRequested).is_err() {
                break;
            }
        }
    });

    let spawn_refresh = |tx: &mpsc::Sender<WatchEvent>| {
        let ticket = gate.issue();
        let tx = tx.clone();
        let client = ctx.client.clone();
        let timezone = ctx.timezone;
        thread::spawn(move || {
            let result = load_today(&client, timezone, generate);
            let _ = tx.send(WatchEvent::Finished(ticket, result));
        });
    };

    spawn_refresh(&tx);
    let mut next_tick = Instant::now() + interval;

    loop {
        let wait = next_tick.saturating_duration_since(Instant::now());
        match rx.recv_timeout(wait) {
            Ok(WatchEvent::RefreshRequested) => spawn_refresh(&tx),
            Ok(WatchEvent::Finished(ticket, result)) => {
                if !gate.accept(ticket) {
                    tracing::debug!(?ticket, "dropping stale refresh");
                    continue;
                }
                let stamp = ctx.timezone.clock(Utc::now());
                match result {
                    Ok(result) => render_today(&result, ctx, Some(&stamp)),
                    // Keep watching; the next tick may succeed
                    Err(e) => eprintln!("[{stamp}] {e}"),
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                spawn_refresh(&tx);
                next_tick = Instant::now() + interval;
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => return Ok(()),
        }
    }
}

/// Resolve `--since/--until` into a window; defaults to the 7 days ending today
pub(crate) fn resolve_range(args: &RangeArgs, today: NaiveDate) -> Result<AggregationWindow, AppError> {
    let until = match &args.until {
        Some(raw) => parse_date(raw)?,
        None => today,
    };
    let since = match &args.since {
        Some(raw) => parse_date(raw)?,
        None => AggregationWindow::trailing(until, AGGREGATION_DAYS).start,
    };
    if since > until {
        return Err(AppError::InvalidRange {
            since: since.to_string(),
            until: until.to_string(),
        });
    }
    Ok(AggregationWindow {
        start: since,
        end: until,
    })
}

fn handle_range(args: &RangeArgs, ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let window = resolve_range(args, ctx.timezone.today())?;
    let days = normalize_all(ctx.client.range(window)?, window.end);
    let total = aggregate_days(&days, window.end);

    if ctx.cli.json {
        println!("{}", output_range_json(&days, &total, ctx.cli.order));
        return Ok(());
    }
    if days.is_empty() {
        println!("No sales data found for {} to {}.", window.start, window.end);
        return Ok(());
    }
    print_range_table(&days, &total, ctx.table_options());
    Ok(())
}

fn handle_overview(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let overview = ctx.client.overview()?;
    if ctx.cli.json {
        println!("{}", output_overview_json(&overview));
    } else {
        print_overview_table(&overview, ctx.cli.use_color(), ctx.number_format);
    }
    Ok(())
}

fn handle_categories(args: &CategoriesArgs, ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let today = ctx.timezone.today();
    let start = today
        .checked_sub_days(Days::new(u64::from(args.days)))
        .unwrap_or(NaiveDate::MIN);
    let window = AggregationWindow { start, end: today };
    let rows = ctx.client.category_revenues(window)?;

    if ctx.cli.json {
        println!("{}", output_category_json(&rows, ctx.cli.order));
        return Ok(());
    }
    if rows.is_empty() {
        println!("No categories found.");
        return Ok(());
    }
    print_category_table(
        &rows,
        window,
        ctx.cli.order,
        ctx.cli.use_color(),
        ctx.number_format,
    );
    Ok(())
}

fn handle_generate(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    ctx.client.generate()?;
    eprintln!("Analytics generation triggered on {}", ctx.client.base_url());
    Ok(())
}

pub(crate) fn run(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    match &ctx.cli.command {
        None => handle_today(&TodayArgs::default(), ctx),
        Some(Commands::Today(args)) => handle_today(args, ctx),
        Some(Commands::Range(args)) => handle_range(args, ctx),
        Some(Commands::Overview) => handle_overview(ctx),
        Some(Commands::Categories(args)) => handle_categories(args, ctx),
        Some(Commands::Generate) => handle_generate(ctx),
    }
}
