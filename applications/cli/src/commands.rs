/// Line-oriented command parsing
use crate::error::{CliError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Pause/resume, or start playing
    Toggle,
    Next,
    Previous,
    Stop,
    /// Play the queue entry at this position (1-based on the command line)
    Play(usize),
    /// Relative seek in seconds; `None` uses the configured step
    SeekBy(Option<f64>),
    SeekBack(Option<f64>),
    SeekTo(f64),
    Volume(u8),
    VolumeUp,
    VolumeDown,
    Mute,
    Shuffle,
    Repeat,
    /// Append a track by catalog id
    Add(String),
    /// Queue a track right after the current one
    PlayNext(String),
    /// Toggle the star on a track, or on the playing one
    Star(Option<String>),
    Remove(usize),
    Move { from: usize, to: usize },
    Clear,
    /// Replace the queue with the current view and play it
    PlayView,
    /// Enter an artist or album view
    Open(String),
    Back,
    List,
    Queue,
    Status,
    History,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  p | toggle          play/pause
  n | next            next track
  b | prev            previous track (restarts after 3s)
  stop                stop playback
  play <n>            play queue entry n
  f [secs] / r [secs] seek forward / back
  seek <secs>         seek to position
  vol <0-100> | + | - volume
  m | mute            toggle mute
  s | shuffle         toggle shuffle
  repeat              cycle repeat (off, all, one)
  add <id>            append track
  next-up <id>        play track after the current one
  star [id]           star/unstar a track (default: playing)
  rm <n>              remove queue entry n
  mv <from> <to>      move queue entry
  clear               clear queue
  ls                  list current view
  open <name>         open artist or album view
  back                return to previous view
  playall             queue current view and play it
  q | queue           show queue
  status              show player state
  history             recently played
  quit                save preferences and exit";

/// Parse one input line; `Ok(None)` for blank lines
pub fn parse(line: &str) -> Result<Option<Command>> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();

    let command = match (head.to_ascii_lowercase().as_str(), rest.as_slice()) {
        ("p" | "toggle" | "pause", []) => Command::Toggle,
        ("n" | "next", []) => Command::Next,
        ("b" | "prev" | "previous", []) => Command::Previous,
        ("stop", []) => Command::Stop,
        ("play", [n]) => Command::Play(position(n)?),
        ("f" | "forward", []) => Command::SeekBy(None),
        ("f" | "forward", [secs]) => Command::SeekBy(Some(seconds(secs)?)),
        ("r" | "rewind", []) => Command::SeekBack(None),
        ("r" | "rewind", [secs]) => Command::SeekBack(Some(seconds(secs)?)),
        ("seek", [secs]) => Command::SeekTo(seconds(secs)?),
        ("vol" | "volume", ["+"]) | ("+", []) => Command::VolumeUp,
        ("vol" | "volume", ["-"]) | ("-", []) => Command::VolumeDown,
        ("vol" | "volume", [level]) => Command::Volume(
            level
                .parse::<u8>()
                .ok()
                .filter(|l| *l <= 100)
                .ok_or_else(|| CliError::Command(format!("volume must be 0-100, got {level}")))?,
        ),
        ("m" | "mute", []) => Command::Mute,
        ("s" | "shuffle", []) => Command::Shuffle,
        ("repeat", []) => Command::Repeat,
        ("add", [id]) => Command::Add((*id).to_string()),
        ("next-up" | "playnext", [id]) => Command::PlayNext((*id).to_string()),
        ("star", []) => Command::Star(None),
        ("star", [id]) => Command::Star(Some((*id).to_string())),
        ("rm" | "remove", [n]) => Command::Remove(position(n)?),
        ("mv" | "move", [from, to]) => Command::Move {
            from: position(from)?,
            to: position(to)?,
        },
        ("clear", []) => Command::Clear,
        ("playall", []) => Command::PlayView,
        ("open" | "cd", name) if !name.is_empty() => Command::Open(name.join(" ")),
        ("back" | "..", []) => Command::Back,
        ("ls", []) => Command::List,
        ("q" | "queue", []) => Command::Queue,
        ("status", []) => Command::Status,
        ("history", []) => Command::History,
        ("h" | "help" | "?", []) => Command::Help,
        ("quit" | "exit", []) => Command::Quit,
        _ => return Err(CliError::Command(format!("unknown command: {}", line.trim()))),
    };
    Ok(Some(command))
}

/// 1-based position from the user, as a 0-based index
fn position(word: &str) -> Result<usize> {
    match word.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(CliError::Command(format!(
            "expected a position starting at 1, got {word}"
        ))),
    }
}

fn seconds(word: &str) -> Result<f64> {
    word.parse::<f64>()
        .ok()
        .filter(|s| s.is_finite() && *s >= 0.0)
        .ok_or_else(|| CliError::Command(format!("expected seconds, got {word}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_transport() {
        assert_eq!(parse("p").unwrap(), Some(Command::Toggle));
        assert_eq!(parse("  NEXT ").unwrap(), Some(Command::Next));
        assert_eq!(parse("play 3").unwrap(), Some(Command::Play(2)));
        assert_eq!(parse("f").unwrap(), Some(Command::SeekBy(None)));
        assert_eq!(parse("r 30").unwrap(), Some(Command::SeekBack(Some(30.0))));
        assert_eq!(parse("seek 12.5").unwrap(), Some(Command::SeekTo(12.5)));
    }

    #[test]
    fn parses_volume() {
        assert_eq!(parse("vol 40").unwrap(), Some(Command::Volume(40)));
        assert_eq!(parse("vol +").unwrap(), Some(Command::VolumeUp));
        assert_eq!(parse("-").unwrap(), Some(Command::VolumeDown));
        assert!(parse("vol 101").is_err());
    }

    #[test]
    fn parses_queue_edits() {
        assert_eq!(parse("add t1").unwrap(), Some(Command::Add("t1".into())));
        assert_eq!(parse("mv 1 4").unwrap(), Some(Command::Move { from: 0, to: 3 }));
        assert_eq!(parse("star").unwrap(), Some(Command::Star(None)));
        assert_eq!(parse("star t1").unwrap(), Some(Command::Star(Some("t1".into()))));
        assert_eq!(parse("open Some Band").unwrap(), Some(Command::Open("Some Band".into())));
    }

    #[test]
    fn blank_is_nothing() {
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse("play 0").is_err());
        assert!(parse("play x").is_err());
        assert!(parse("seek -3").is_err());
        assert!(parse("dance").is_err());
        assert!(parse("open").is_err());
    }
}
