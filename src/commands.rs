// Subcommand handlers. Each one prints its console report and writes the
// requested files; all data shaping happens in the library.
use anyhow::{Context, Result};
use tracing::warn;

use monsoon_report::config::Config;
use monsoon_report::figures::{figure_keys, FigureStore};
use monsoon_report::output::{monthly_preview, preview_table_rows, write_csv, write_json};
use monsoon_report::processor::{build_payload, build_payload_or};
use monsoon_report::sources::SourceChain;
use monsoon_report::types::{ApiResponse, FigureRow, MonthNameRow, RainfallPayload, SeriesBounds};
use monsoon_report::util::{format_int, format_number, month_name};

use crate::cli::{FigureArgs, MonthsArgs, RainfallArgs};

pub fn rainfall(args: RainfallArgs, config: &Config) -> Result<()> {
    let csv_path = args.csv.unwrap_or_else(|| config.data.rainfall_csv.clone());
    let results_dir = args
        .results_dir
        .unwrap_or_else(|| config.data.results_dir.clone());
    let chain = SourceChain::standard(&csv_path, &results_dir);

    let series = match chain.load(args.monsoon) {
        Ok(s) => s,
        Err(e) => {
            if let Some(path) = &args.output {
                let failure: ApiResponse<RainfallPayload> = ApiResponse::err(e.to_string());
                write_json(path, &failure)
                    .with_context(|| format!("writing {}", path.display()))?;
            }
            return Err(e).context("no rainfall data available");
        }
    };

    if let Some(report) = &series.report {
        println!(
            "Processing dataset... ({} rows read, {} days kept, {} months averaged)",
            format_int(report.total_rows),
            format_int(report.daily_rows),
            format_int(report.monthly_rows)
        );
        if report.rejected_rows + report.skipped_dates > 0 {
            println!(
                "Note: {} rows skipped due to parse/validation errors.",
                format_int(report.rejected_rows + report.skipped_dates)
            );
        }
        if report.nan_values > 0 {
            println!(
                "Info: {} days have no numeric index value.",
                format_int(report.nan_values)
            );
        }
    }
    println!("Source: {}\n", series.source);

    let payload = match build_payload(&series.monthly, args.monsoon) {
        Ok(p) => p,
        Err(e) => {
            warn!(error = %e, "using fallback color bounds");
            build_payload_or(
                &series.monthly,
                args.monsoon,
                config.display.fallback_bounds(),
            )
        }
    };

    let selected: Vec<_> = payload.yearly_data.values().flatten().copied().collect();
    let bounds = SeriesBounds {
        min: payload.min_value,
        max: payload.max_value,
    };
    println!(
        "{} Rainfall Index by Month",
        if payload.is_monsoon_only {
            "Monsoon"
        } else {
            "All-Year"
        }
    );
    println!(
        "(Range {} to {}, {} years)\n",
        format_number(payload.min_value, 2),
        format_number(payload.max_value, 2),
        format_int(payload.yearly_data.len())
    );
    let rows = args.rows.unwrap_or(config.display.preview_rows);
    preview_table_rows(&monthly_preview(&selected, &bounds), rows);

    if let Some(path) = &args.monthly_csv {
        write_csv(path, &selected).with_context(|| format!("writing {}", path.display()))?;
        println!("(Monthly averages exported to {})", path.display());
    }
    if let Some(path) = &args.daily_csv {
        if series.daily.is_empty() {
            warn!(source = %series.source, "source has no daily readings, skipping daily CSV");
        } else {
            write_csv(path, &series.daily)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("(Daily series exported to {})", path.display());
        }
    }
    if let Some(path) = &args.output {
        write_json(path, &ApiResponse::ok(&payload))
            .with_context(|| format!("writing {}", path.display()))?;
        println!("(JSON response saved to {})", path.display());
    }
    Ok(())
}

pub fn figure(args: FigureArgs, config: &Config) -> Result<()> {
    if args.list {
        let rows: Vec<FigureRow> = figure_keys()
            .map(|(key, file)| FigureRow {
                key: key.to_string(),
                file: file.to_string(),
            })
            .collect();
        preview_table_rows(&rows, rows.len());
        return Ok(());
    }
    let Some(key) = args.key else {
        anyhow::bail!("a figure key is required");
    };

    let mut store = FigureStore::new(&config.data.results_dir, config.cache.figure_capacity);
    let figure = store
        .get(&key)
        .with_context(|| format!("loading figure {key} from {}", store.dir().display()))?;
    match &args.output {
        Some(path) => {
            write_json(path, &*figure)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("(Figure {key} saved to {})", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&*figure)?),
    }
    Ok(())
}

pub fn months(args: MonthsArgs) -> Result<()> {
    let rows = (1..=12)
        .map(|n| -> Result<MonthNameRow> {
            Ok(MonthNameRow {
                number: n,
                name: month_name(n, args.short)?.to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    preview_table_rows(&rows, rows.len());
    Ok(())
}
