use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

/// Tickers / collected / skipped bars for a pass over the candidate tickers.
pub(crate) struct Progress {
    _multi: Option<MultiProgress>,
    pub(crate) total: ProgressBar,
    pub(crate) success: ProgressBar,
    pub(crate) fails: ProgressBar,
}

impl Progress {
    pub(crate) fn hidden() -> Self {
        Self {
            _multi: None,
            total: ProgressBar::hidden(),
            success: ProgressBar::hidden(),
            fails: ProgressBar::hidden(),
        }
    }

    /// Print above the bars; a no-op when hidden.
    pub(crate) fn println(&self, msg: impl AsRef<str>) {
        self.total.println(msg);
    }

    pub(crate) fn finish(&self) {
        self.total.finish_and_clear();
        self.success.finish_and_clear();
        self.fails.finish_and_clear();
    }
}

/// Progress over the candidate tickers: the top bar names the ticker being pulled, the two
/// below count collected & skipped tickers.
pub(crate) fn multi_progress(len: usize) -> anyhow::Result<Progress> {
    let multi = MultiProgress::new();

    let total = multi.add(
        ProgressBar::new(len as u64).with_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.magenta} pulling fundamentals for {msg:.bold}\n \
                        {prefix:>9.white} |{bar:50.white/grey}| {human_pos}/{human_len} \
                        [Time: {elapsed}, ETA: {eta}]",
                )?
                .progress_chars("## "),
        ),
    );
    total.set_prefix("tickers");
    total.enable_steady_tick(Duration::from_millis(100));

    let success = multi.insert_after(&total, counter_bar(len, "collected", "green")?);
    let fails = multi.insert_after(&success, counter_bar(len, "skipped", "red")?);

    Ok(Progress {
        _multi: Some(multi),
        total,
        success,
        fails,
    })
}

fn counter_bar(len: usize, label: &'static str, colour: &str) -> anyhow::Result<ProgressBar> {
    let style = ProgressStyle::default_bar()
        .template(&format!(
            " {{prefix:>9.{colour}}} |{{bar:50.{colour}}}| {{pos:<3.{colour}}}"
        ))?
        .progress_chars("## ");
    let bar = ProgressBar::new(len as u64).with_style(style);
    bar.set_prefix(label);
    Ok(bar)
}

//////////////////////////////////////////////////////////////
// -- TESTS --
//////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_templates_parse() {
        let progress = multi_progress(3).unwrap();
        progress.success.inc(2);
        progress.fails.inc(1);
        assert_eq!(progress.success.position(), 2);
        assert_eq!(progress.fails.position(), 1);
        progress.finish();
    }
}
