use hashcheck_lookup::{RateSnapshot, RunReport, StatusSink, Tone};

/// Print the end-of-run summary followed by the rate budget.
pub fn render_summary(sink: &dyn StatusSink, report: &RunReport) {
    sink.write_line(Tone::Plain, "");
    sink.write_line(Tone::Ok, &format!("OK: {}", report.stats.confirmed));
    sink.write_line(Tone::Warn, &format!("NOT FOUND: {}", report.stats.unconfirmed));
    if report.stats.classified() < report.total as u64 {
        let skipped = report.total as u64 - report.stats.classified();
        sink.write_line(Tone::Error, &format!("NOT CHECKED: {skipped}"));
    }
    sink.write_line(Tone::Info, &format!("Elapsed: {:.2} s", report.elapsed.as_secs_f64()));
    sink.write_line(Tone::Info, &format!("Average TPS: {:.2}", report.throughput()));
    render_limit(sink, &report.rate);
}

pub fn render_limit(sink: &dyn StatusSink, rate: &RateSnapshot) {
    sink.write_line(Tone::Plain, "");
    sink.write_line(Tone::Info, "LIMIT STATUS");
    sink.write_line(Tone::Plain, &rate.to_string());
    if !rate.is_known() {
        sink.write_line(Tone::Warn, "No rate-limit headers received.");
    }
}
