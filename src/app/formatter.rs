use crate::app::models::{Mode, RevertReport};

pub struct ReportPrinter;

impl ReportPrinter {
    /// One line per link a dry run would have replaced.
    pub fn dry_run_pairings(report: &RevertReport, mode: Mode) -> String {
        let mut output = String::new();

        for replacement in &report.replaced {
            output.push_str(&format!(
                "would {} {} {} -> {}\n",
                mode.verb(),
                replacement.kind.noun(),
                replacement.target.display(),
                replacement.link.display()
            ));
        }

        output.trim_end().to_string()
    }

    /// Counts every discovered link, excluded ones included.
    pub fn summary(report: &RevertReport) -> String {
        format!("Reverted {} symlinks", report.discovered)
    }

    pub fn failures(report: &RevertReport) -> String {
        report
            .failures
            .iter()
            .map(|f| format!("failed: {}: {}", f.link.display(), f.error))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::{Failure, Replacement, TargetKind};
    use crate::app::reverter::RevertError;
    use std::path::PathBuf;

    fn report() -> RevertReport {
        RevertReport {
            discovered: 4,
            excluded: 1,
            replaced: vec![
                Replacement {
                    link: PathBuf::from("/p/lks/d"),
                    target: PathBuf::from("/p/real/d"),
                    kind: TargetKind::Dir,
                },
                Replacement {
                    link: PathBuf::from("/p/lks/xxx.txt"),
                    target: PathBuf::from("/p/real/xxx.txt"),
                    kind: TargetKind::File,
                },
            ],
            failures: vec![Failure {
                link: PathBuf::from("/p/broken"),
                error: RevertError::Unresolved {
                    link: PathBuf::from("/p/broken"),
                },
            }],
        }
    }

    #[test]
    fn summary_counts_excluded_and_failed_links() {
        assert_eq!(ReportPrinter::summary(&report()), "Reverted 4 symlinks");
    }

    #[test]
    fn pairings_name_target_then_link() {
        let out = ReportPrinter::dry_run_pairings(&report(), Mode::Move);
        assert_eq!(
            out,
            "would move directory /p/real/d -> /p/lks/d\n\
             would move file /p/real/xxx.txt -> /p/lks/xxx.txt"
        );
    }

    #[test]
    fn failures_one_per_line() {
        assert_eq!(
            ReportPrinter::failures(&report()),
            "failed: /p/broken: target of /p/broken could not be resolved"
        );
        assert_eq!(ReportPrinter::failures(&RevertReport::default()), "");
    }
}
