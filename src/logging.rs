/* ************************************************************************ **
** This file is part of cvforce, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::fmt;
use std::path::Path;
use std::time::Instant;

use ansi_term::Colour;
use log::{Level, LevelFilter};

use crate::FailResult;

/// Install the global logger.
///
/// Messages go to stdout (and to `path`, if given) as
/// `[  secs.millis][target][LEVEL] message`.
/// Fails if a logger has already been installed.
pub fn setup_global_logger(path: Option<&Path>, level: LevelFilter) -> FailResult<()> {
    let start = Instant::now();
    let mut fern = fern::Dispatch::new()
        .format(move |out, message, record| {
            let t = start.elapsed();
            out.finish(format_args!("[{:>4}.{:03}s][{}][{}] {}",
                t.as_secs(),
                t.subsec_millis(),
                record.target(),
                ColorizedLevel(record.level()),
                message,
            ))
        })
        .level(level)
        .chain(std::io::stdout());

    if let Some(path) = path {
        fern = fern.chain(fern::log_file(path)?);
    }

    fern.apply()?;
    debug!("logging initialized at level {}", level);
    Ok(())
}

#[derive(Debug, Copy, Clone)]
pub struct ColorizedLevel(pub Level);

impl fmt::Display for ColorizedLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let style = match self.0 {
            Level::Error => Colour::Red.bold(),
            Level::Warn  => Colour::Red.normal(),
            Level::Info  => Colour::Cyan.bold(),
            Level::Debug => Colour::Yellow.dimmed(),
            Level::Trace => Colour::Cyan.normal(),
        };
        write!(f, "{}", style.paint(self.0.to_string()))
    }
}
