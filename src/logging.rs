use std::{
    fs::{self, File, OpenOptions},
    path::Path,
};

use env_logger::{Env, Target};

const LOG_FILE_NAME: &str = "vocabr.log";

///Filtered by `RUST_LOG`, `warn` by default. The terminal UI owns stdout and
///stderr, so records go to `<data_dir>/vocabr.log` whenever it can be opened.
pub fn init(data_dir: Option<&Path>) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));

    if let Some(file) = data_dir.and_then(open_log_file) {
        builder.target(Target::Pipe(Box::new(file)));
    }

    // Already initialised (tests, embedding): keep the existing logger.
    let _ = builder.try_init();
}

fn open_log_file(dir: &Path) -> Option<File> {
    fs::create_dir_all(dir).ok()?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE_NAME))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::{init, LOG_FILE_NAME};

    #[test]
    fn creates_log_file() {
        let dir = tempfile::tempdir().expect("Unable to create temp dir");
        let nested = dir.path().join("vocabr");
        init(Some(&nested));
        assert!(nested.join(LOG_FILE_NAME).exists());
    }
}
