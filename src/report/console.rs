use crate::report::report_model::ReplayReport;

// ============================================================================
// Console reporter — formatted terminal output
// ============================================================================

/// Format a replay report for terminal output.
///
/// Produces output like:
/// ```text
/// === Replay: scenarios ===
///
/// ✓ PASS  text field round trip (5 steps, 4 checks)
/// ✗ FAIL  checkbox disable (4 steps, 2 checks)
///     [FAIL] Step 3: dirty — expected true, actual false
///
/// === Results: 1 passed, 1 failed (2 total) ===
/// ```
pub fn format_console_report(report: &ReplayReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Replay: {} ===\n\n", report.suite_name));

    for result in &report.results {
        let marker = if result.passed {
            "\u{2713} PASS"
        } else {
            "\u{2717} FAIL"
        };

        out.push_str(&format!(
            "{}  {} ({} steps, {} checks)\n",
            marker,
            result.name,
            result.steps_run,
            result.expectations.len()
        ));

        if let Some(ref error) = result.error {
            out.push_str(&format!("    [ERROR] {}\n", error));
        }

        for check in result.expectations.iter().filter(|c| !c.passed) {
            out.push_str(&format!(
                "    [FAIL] Step {}: {} — expected {}, actual {}\n",
                check.step_index, check.check, check.expected, check.actual
            ));
        }
    }

    out.push_str(&format!(
        "\n=== Results: {} passed, {} failed ({} total)",
        report.passed, report.failed, report.total
    ));

    if let Some(ms) = report.duration_ms {
        let secs = ms as f64 / 1000.0;
        out.push_str(&format!(" in {:.1}s", secs));
    }

    out.push_str(" ===\n");

    out
}
