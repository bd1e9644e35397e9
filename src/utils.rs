use std::{borrow::Cow, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

pub fn spinner(message: impl Into<Cow<'static, str>>) -> ProgressBar {
    let pb = ProgressBar::new_spinner()
        .with_style(
            ProgressStyle::with_template("[{elapsed_precise}] {spinner} {msg}")
                .expect("hardcoded"),
        )
        .with_message(message);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
