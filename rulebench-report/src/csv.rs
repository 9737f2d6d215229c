//! CSV Output
//!
//! One row per scenario, in catalog order.

use crate::report::Report;

const HEADER: &str = "scenario,status,samples,iterations,mean_ns,median_ns,std_dev_ns,std_error_ns,min_ns,max_ns,p95_ns,p99_ns,ops_per_sec,outliers,mvalue,error";

/// Render the report as CSV
pub fn generate_csv_report(report: &Report) -> String {
    let mut out = String::with_capacity(128 * (report.scenarios.len() + 1));
    out.push_str(HEADER);
    out.push('\n');

    for scenario in &report.scenarios {
        let status = format!("{:?}", scenario.status).to_lowercase();
        let error = scenario
            .failure
            .as_ref()
            .map(|f| escape(&f.message))
            .unwrap_or_default();

        match &scenario.metrics {
            Some(m) => out.push_str(&format!(
                "{},{},{},{},{:.3},{:.3},{:.3},{:.3},{:.3},{:.3},{:.3},{:.3},{},{},{:.2},{}\n",
                escape(&scenario.name),
                status,
                m.samples,
                m.iterations,
                m.mean_ns,
                m.median_ns,
                m.std_dev_ns,
                m.std_error_ns,
                m.min_ns,
                m.max_ns,
                m.p95_ns,
                m.p99_ns,
                m.ops_per_sec.map(|o| format!("{o:.1}")).unwrap_or_default(),
                m.outliers_low + m.outliers_high,
                m.mvalue,
                error,
            )),
            None => out.push_str(&format!(
                "{},{},,,,,,,,,,,,,,{}\n",
                escape(&scenario.name),
                status,
                error
            )),
        }
    }

    out
}

/// Quote a field when it contains a delimiter, quote or newline
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("invoke"), "invoke");
        assert_eq!(escape("a,b"), "\"a,b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_header_and_failed_row_have_same_arity() {
        let columns = HEADER.split(',').count();
        let row = format!("{},{},,,,,,,,,,,,,,{}", "get", "failed", "boom");
        assert_eq!(row.split(',').count(), columns);
    }
}
