//! Human-readable and JSON report of one evaluation.

use chaoscast_core::data::{DataSource, LoadedSeries};
use chaoscast_core::domain::Bar;
use chaoscast_core::fingerprint::RunFingerprint;
use chaoscast_core::signals::{DecisionRule, Signal};
use chaoscast_core::Evaluation;
use chrono::NaiveDate;
use serde::Serialize;

const PREVIEW: usize = 5;

#[derive(Debug, Serialize)]
pub struct Report {
    pub symbol: String,
    pub source: DataSource,
    pub bar_count: usize,
    pub dropped_bars: usize,
    pub head: Vec<Bar>,
    pub chaotic_tail: Vec<f64>,
    pub model: String,
    pub aic: f64,
    pub bic: f64,
    #[serde(skip)]
    pub model_summary: String,
    pub forecast: Vec<f64>,
    pub as_of: NaiveDate,
    pub tomorrow: NaiveDate,
    pub chaotic_tomorrow: f64,
    pub forecast_tomorrow: f64,
    pub signal: Signal,
    pub rule: DecisionRule,
    pub atr: f64,
    pub pct_change: Option<f64>,
    pub forecast_mean: Option<f64>,
    pub run_id: String,
}

impl Report {
    pub fn new(
        loaded: &LoadedSeries,
        evaluation: &Evaluation,
        as_of: NaiveDate,
        fingerprint: &RunFingerprint,
    ) -> Self {
        let series = &loaded.series;
        let classification = &evaluation.classification;
        Self {
            symbol: series.symbol().to_string(),
            source: loaded.source,
            bar_count: series.len(),
            dropped_bars: loaded.dropped,
            head: series.bars().iter().take(PREVIEW).copied().collect(),
            chaotic_tail: evaluation.chaotic_tail(PREVIEW).to_vec(),
            model: evaluation.forecast.model.order.to_string(),
            aic: evaluation.forecast.model.aic,
            bic: evaluation.forecast.model.bic,
            model_summary: evaluation.forecast.model.summary(),
            forecast: evaluation.forecast.values.clone(),
            as_of,
            tomorrow: as_of.succ_opt().unwrap_or(as_of),
            chaotic_tomorrow: evaluation.next_chaotic_price(),
            forecast_tomorrow: evaluation.forecast.next(),
            signal: classification.signal,
            rule: classification.rule,
            atr: classification.atr,
            pct_change: classification.pct_change,
            forecast_mean: classification.forecast_mean,
            run_id: fingerprint.run_id(),
        }
    }

    /// `verbose` adds the fitted model summary.
    pub fn print(&self, verbose: bool) {
        println!("Historical Data for {} (head):", self.symbol);
        println!(
            "{:<12} {:>12} {:>12} {:>12} {:>12} {:>14}",
            "Date", "Open", "High", "Low", "Close", "Volume"
        );
        for bar in &self.head {
            println!(
                "{:<12} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>14}",
                bar.date, bar.open, bar.high, bar.low, bar.close, bar.volume
            );
        }
        println!("({} bars total)", self.bar_count);

        println!();
        println!("Chaotic Prices (last {}):", self.chaotic_tail.len());
        println!("{}", format_values(&self.chaotic_tail));

        println!();
        println!(
            "{} Forecast for Next {} Days:",
            self.model,
            self.forecast.len()
        );
        println!("{}", format_values(&self.forecast));
        if verbose {
            println!();
            print!("{}", self.model_summary);
        } else {
            println!("AIC: {:.2}  BIC: {:.2}", self.aic, self.bic);
        }

        println!();
        println!(
            "Chaotic Price for Tomorrow ({}): {:.2}",
            self.tomorrow, self.chaotic_tomorrow
        );
        println!(
            "{} Forecast for Tomorrow ({}): {:.2}",
            self.model, self.tomorrow, self.forecast_tomorrow
        );

        println!();
        println!("{} - Trading Instruction: {}", self.tomorrow, self.signal);
        println!("  decided by: {}", describe_rule(self));

        if self.source == DataSource::Synthetic {
            println!();
            println!("WARNING: Result based on SYNTHETIC data");
        }
        if self.dropped_bars > 0 {
            println!("WARNING: {} bar(s) with missing prices were dropped", self.dropped_bars);
        }
        println!("Run ID: {}", self.run_id);
    }
}

fn format_values(values: &[f64]) -> String {
    let parts: Vec<String> = values.iter().map(|v| format!("{v:.2}")).collect();
    format!("[{}]", parts.join(", "))
}

fn describe_rule(report: &Report) -> String {
    match report.rule {
        DecisionRule::VolatilityGate => format!("ATR {:.2} above threshold", report.atr),
        DecisionRule::MomentumGate => format!(
            "day-over-day move of {:+.2}%",
            report.pct_change.unwrap_or_default()
        ),
        DecisionRule::ForecastGate => format!(
            "mean forecast {:.2} (ATR {:.2}, move {:+.2}%)",
            report.forecast_mean.unwrap_or_default(),
            report.atr,
            report.pct_change.unwrap_or_default()
        ),
    }
}
