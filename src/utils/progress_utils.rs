use indicatif::{ProgressBar, ProgressStyle};

pub fn progress_bar(len: u64, message: String) -> Option<ProgressBar> {
    let bar = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template("[{elapsed_precise} / {eta_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
        .ok()?;

    bar.set_style(style.progress_chars("##-"));
    bar.set_message(message);

    Some(bar)
}
