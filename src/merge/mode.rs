use core::fmt;
use core::str::FromStr;

/// How a merge treats its remaining sources when it shuts down early.
///
/// A merge shuts down early when one of its sources fails, or when the
/// consumer stops it before every source is exhausted. Natural exhaustion
/// leaves no sources behind, so the mode does not matter there.
///
/// | Mode | Remaining sources |
/// | --- | --- |
/// | [`NoStop`](Mode::NoStop) | abandoned, never polled again |
/// | [`StopNoWait`](Mode::StopNoWait) | asked to stop once, not awaited |
/// | [`StopAndWait`](Mode::StopAndWait) | asked to stop and awaited, errors collected |
///
/// # Examples
///
/// ```
/// use fanin::merge::Mode;
///
/// let mode: Mode = "stop-and-wait".parse().unwrap();
/// assert_eq!(mode, Mode::StopAndWait);
/// assert_eq!(Mode::default(), Mode::StopNoWait);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Abandon the remaining sources without telling them.
    NoStop,
    /// Ask every remaining source to stop, without waiting for it to finish
    /// and ignoring any error it reports.
    ///
    /// A stop which does not finish right away keeps being driven whenever
    /// the merge is polled again, through `next` or `stop`. Dropping the
    /// merge while such a stop is still pending cuts the cleanup short.
    #[default]
    StopNoWait,
    /// Ask every remaining source to stop and wait until all of them have
    /// finished, including requests which were already outstanding (the first
    /// request of a source the merge never got to poll counts). The first
    /// error reported while doing so is surfaced to the consumer.
    StopAndWait,
}

impl Mode {
    /// The canonical name of the mode.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Mode::NoStop => "no-stop",
            Mode::StopNoWait => "stop-no-wait",
            Mode::StopAndWait => "stop-and-wait",
        }
    }

    /// Whether remaining sources are asked to stop at all.
    pub const fn stops_sources(&self) -> bool {
        !matches!(self, Mode::NoStop)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "no-stop" | "iters-noclose" => Ok(Mode::NoStop),
            "stop-no-wait" | "iters-close-nowait" => Ok(Mode::StopNoWait),
            "stop-and-wait" | "iters-close-wait" => Ok(Mode::StopAndWait),
            _ => Err(ParseModeError {
                input: s.to_owned(),
            }),
        }
    }
}

/// The error returned when parsing an unknown [`Mode`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown merge mode `{input}`, expected `no-stop`, `stop-no-wait` or `stop-and-wait`")]
pub struct ParseModeError {
    input: String,
}

impl ParseModeError {
    /// The text which failed to parse.
    pub fn input(&self) -> &str {
        &self.input
    }
}
