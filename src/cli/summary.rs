//! End-of-run report

use std::fmt::Write;

#[cfg(feature = "colorized_output")]
use console::style;

use conedata::pipeline::RunStatistics;

/// Plain-text report of a batch run
#[cfg_attr(feature = "colorized_output", allow(dead_code))]
pub fn format_plain(stats: &RunStatistics) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "conedata Run Summary");
    let _ = writeln!(output, "====================");
    let _ = writeln!(output, "{}", stats);
    let _ = writeln!(
        output,
        "Tests with bad optical data: {}",
        stats.bad_optical_tests
    );
    let _ = writeln!(
        output,
        "Tests with negative delta_P: {}",
        stats.negative_pressure_tests
    );
    for (kind, count) in &stats.failures {
        let _ = writeln!(output, "  {}: {}", kind, count);
    }
    output
}

/// Report with terminal colors, falling back to [`format_plain`]
pub fn format_colored(stats: &RunStatistics) -> String {
    #[cfg(feature = "colorized_output")]
    {
        use console::Emoji;

        static OK: Emoji<'_, '_> = Emoji("✓", "[OK]");
        static FAIL: Emoji<'_, '_> = Emoji("✗", "[FAIL]");

        let mut output = String::new();
        let _ = writeln!(output, "{}", style("conedata Run Summary").bold().cyan());
        let _ = writeln!(output, "{}", style("====================").cyan());

        let symbol = if stats.files_failed() == 0 { OK } else { FAIL };
        let _ = writeln!(
            output,
            "[{}] {}: {}/{} ({:.1}%)",
            symbol,
            style("Files parsed successfully").bold(),
            style(stats.files_succeeded).green(),
            stats.files_parsed,
            stats.success_rate()
        );
        let _ = writeln!(
            output,
            "{}: {}",
            style("Tests with bad optical data").bold(),
            style(stats.bad_optical_tests).yellow()
        );
        let _ = writeln!(
            output,
            "{}: {}",
            style("Tests with negative delta_P").bold(),
            style(stats.negative_pressure_tests).red()
        );
        for (kind, count) in &stats.failures {
            let _ = writeln!(output, "  {}: {}", style(kind).red(), count);
        }
        output
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        format_plain(stats)
    }
}
