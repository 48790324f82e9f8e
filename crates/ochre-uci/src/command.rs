//! UCI command parsing.

use std::time::Duration;

use ochre_core::{Position, STARTING_FEN};
use ochre_engine::{RepTable, SearchLimits};

use crate::error::UciError;

/// Parameters for the `go` command.
///
/// All fields are optional; a bare `go` uses defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoParams {
    /// White's remaining time.
    pub wtime: Option<Duration>,
    /// Black's remaining time.
    pub btime: Option<Duration>,
    /// White's increment per move.
    pub winc: Option<Duration>,
    /// Black's increment per move.
    pub binc: Option<Duration>,
    /// Moves until next time control. Accepted but not used: the clock is
    /// always spread over a fixed number of moves.
    pub movestogo: Option<u32>,
    /// Search to this depth only.
    pub depth: Option<i32>,
    /// Search for exactly this duration.
    pub movetime: Option<Duration>,
    /// Search until `stop` (no time limit).
    pub infinite: bool,
    /// Search in pondering mode.
    pub ponder: bool,
}

impl GoParams {
    pub fn limits(&self) -> SearchLimits {
        SearchLimits {
            depth: self.depth,
            movetime: self.movetime,
            wtime: self.wtime,
            btime: self.btime,
            winc: self.winc,
            binc: self.binc,
            infinite: self.infinite,
            ponder: self.ponder,
        }
    }
}

/// Option set through `setoption`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UciOption {
    /// Transposition table size in megabytes.
    Hash(usize),
    /// Evaluation cache size in megabytes.
    EvalHash(usize),
    /// Pawn structure cache size in megabytes.
    PawnHash(usize),
    Ponder(bool),
    OwnBook(bool),
    /// Path of the Polyglot book used when `OwnBook` is on.
    BookFile(String),
}

/// Smallest and largest accepted `Hash` values in megabytes.
pub const HASH_RANGE: std::ops::RangeInclusive<usize> = 1..=1024;

/// Smallest and largest accepted `EvalHash` and `PawnHash` values.
pub const CACHE_RANGE: std::ops::RangeInclusive<usize> = 1..=32;

/// A `position` command: a start position and the moves played from it.
///
/// Moves stay as text until they are played, because each one can only be
/// checked against the position it is played in.
#[derive(Debug, Clone)]
pub struct PositionCommand {
    pub start: Position,
    pub moves: Vec<String>,
}

impl PositionCommand {
    /// Play the moves onto `pos` (which starts as a copy of `start`),
    /// recording every position reached in `reps`. Stops at the first move
    /// that is not legal, leaving `pos` where that move was tried.
    pub fn play(&self, pos: &mut Position, reps: &mut RepTable) -> Result<(), UciError> {
        *pos = self.start.clone();
        reps.clear();
        reps.record(pos.key());
        for text in &self.moves {
            let mv = pos.parse_uci_move(text).map_err(|source| UciError::IllegalMove {
                uci_move: text.clone(),
                source,
            })?;
            pos.make_move(mv);
            reps.record(pos.key());
        }
        Ok(())
    }
}

/// A parsed UCI command.
#[derive(Debug, Clone)]
pub enum Command {
    /// `uci` -- identify the engine.
    Uci,
    /// `isready` -- synchronization ping.
    IsReady,
    /// `ucinewgame` -- reset engine state.
    UciNewGame,
    /// `setoption name <name> value <value>`.
    SetOption(UciOption),
    /// `position` -- set up a board position with optional moves applied.
    Position(PositionCommand),
    /// `go` -- start searching with given parameters.
    Go(GoParams),
    /// `ponderhit` -- opponent played the expected move during pondering.
    PonderHit,
    /// `stop` -- halt the current search.
    Stop,
    /// `quit` -- exit the engine.
    Quit,
    /// `perft <depth>` -- count leaf nodes.
    Perft(usize),
    /// `divide <depth>` -- leaf nodes per root move.
    Divide(usize),
    /// `d` -- print the current position.
    Display,
    /// Unrecognized command (ignored, as the UCI protocol asks).
    Unknown(String),
}

/// Parse a single line of UCI input into a [`Command`].
pub fn parse_command(line: &str) -> Result<Command, UciError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.is_empty() {
        return Ok(Command::Unknown(String::new()));
    }

    match tokens[0] {
        "uci" => Ok(Command::Uci),
        "isready" => Ok(Command::IsReady),
        "ucinewgame" => Ok(Command::UciNewGame),
        "stop" => Ok(Command::Stop),
        "quit" => Ok(Command::Quit),
        "ponderhit" => Ok(Command::PonderHit),
        "d" => Ok(Command::Display),
        "setoption" => parse_setoption(&tokens[1..]),
        "position" => parse_position(&tokens[1..]),
        "go" => parse_go(&tokens[1..]),
        "perft" => parse_perft_depth(tokens.get(1)).map(Command::Perft),
        "divide" => parse_perft_depth(tokens.get(1)).map(Command::Divide),
        _ => Ok(Command::Unknown(tokens[0].to_string())),
    }
}

/// Parse the `position` command arguments.
///
/// Supports:
/// - `position startpos [moves e2e4 d7d5 ...]`
/// - `position fen <fen-string> [moves e2e4 d7d5 ...]`
fn parse_position(tokens: &[&str]) -> Result<Command, UciError> {
    let split = tokens.iter().position(|&t| t == "moves").unwrap_or(tokens.len());
    let (setup, rest) = tokens.split_at(split);

    let fen = match setup {
        ["startpos"] => STARTING_FEN.to_string(),
        ["fen", fields @ ..] if !fields.is_empty() => fields.join(" "),
        _ => return Err(UciError::MalformedPosition),
    };
    let start: Position = fen
        .parse()
        .map_err(|source| UciError::InvalidFen { fen: fen.clone(), source })?;

    let moves = rest.iter().skip(1).map(|t| t.to_string()).collect();
    Ok(Command::Position(PositionCommand { start, moves }))
}

/// Parse `setoption name <name...> [value <value...>]`.
fn parse_setoption(tokens: &[&str]) -> Result<Command, UciError> {
    let Some((&"name", rest)) = tokens.split_first() else {
        return Err(UciError::MalformedOption);
    };
    let split = rest.iter().position(|&t| t == "value").unwrap_or(rest.len());
    let name = rest[..split].join(" ");
    let value = rest.get(split + 1..).map(|v| v.join(" ")).unwrap_or_default();

    let invalid = || UciError::InvalidOptionValue {
        name: name.clone(),
        value: value.clone(),
    };
    let spin = |range: std::ops::RangeInclusive<usize>| {
        value
            .parse::<usize>()
            .ok()
            .filter(|mb| range.contains(mb))
            .ok_or_else(invalid)
    };
    let check = || match value.as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(invalid()),
    };
    let option = match name.to_ascii_lowercase().as_str() {
        "hash" => UciOption::Hash(spin(HASH_RANGE)?),
        "evalhash" => UciOption::EvalHash(spin(CACHE_RANGE)?),
        "pawnhash" => UciOption::PawnHash(spin(CACHE_RANGE)?),
        "ponder" => UciOption::Ponder(check()?),
        "ownbook" => UciOption::OwnBook(check()?),
        "bookfile" if !value.is_empty() => UciOption::BookFile(value.clone()),
        "bookfile" => return Err(invalid()),
        _ => return Err(UciError::UnknownOption { name }),
    };
    Ok(Command::SetOption(option))
}

/// Parse the `go` command arguments.
///
/// Supports: wtime, btime, winc, binc, movestogo, depth, movetime,
/// infinite, ponder. Unknown tokens are silently skipped.
fn parse_go(tokens: &[&str]) -> Result<Command, UciError> {
    let mut params = GoParams::default();

    let mut i = 0;
    while i < tokens.len() {
        match tokens[i] {
            "wtime" => {
                params.wtime = Some(parse_millis(tokens.get(i + 1), "wtime")?);
                i += 2;
            }
            "btime" => {
                params.btime = Some(parse_millis(tokens.get(i + 1), "btime")?);
                i += 2;
            }
            "winc" => {
                params.winc = Some(parse_millis(tokens.get(i + 1), "winc")?);
                i += 2;
            }
            "binc" => {
                params.binc = Some(parse_millis(tokens.get(i + 1), "binc")?);
                i += 2;
            }
            "movestogo" => {
                params.movestogo = Some(parse_int(tokens.get(i + 1), "movestogo")?);
                i += 2;
            }
            "depth" => {
                params.depth = Some(parse_int(tokens.get(i + 1), "depth")?);
                i += 2;
            }
            "movetime" => {
                params.movetime = Some(parse_millis(tokens.get(i + 1), "movetime")?);
                i += 2;
            }
            "infinite" => {
                params.infinite = true;
                i += 1;
            }
            "ponder" => {
                params.ponder = true;
                i += 1;
            }
            _ => {
                // Unknown token -- skip per UCI convention
                i += 1;
            }
        }
    }

    Ok(Command::Go(params))
}

/// Parse a millisecond value from a token. GUIs send negative clocks when
/// a flag has fallen; those count as zero.
fn parse_millis(token: Option<&&str>, param: &str) -> Result<Duration, UciError> {
    let ms: i64 = parse_int(token, param)?;
    Ok(Duration::from_millis(ms.max(0) as u64))
}

/// Parse an integer value from a token.
fn parse_int<T: std::str::FromStr>(token: Option<&&str>, param: &str) -> Result<T, UciError> {
    let value = token.ok_or_else(|| UciError::MissingGoValue {
        param: param.to_string(),
    })?;
    value.parse().map_err(|_| UciError::InvalidGoValue {
        param: param.to_string(),
        value: value.to_string(),
    })
}

fn parse_perft_depth(token: Option<&&str>) -> Result<usize, UciError> {
    let value = token.copied().unwrap_or_default();
    match value.parse::<usize>() {
        Ok(depth) if depth >= 1 => Ok(depth),
        _ => Err(UciError::InvalidPerftDepth {
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn play(line: &str) -> Result<Position, UciError> {
        let Command::Position(cmd) = parse_command(line)? else {
            panic!("expected Position");
        };
        let mut pos = Position::startpos();
        let mut reps = RepTable::new();
        cmd.play(&mut pos, &mut reps)?;
        Ok(pos)
    }

    #[test]
    fn parse_simple_commands() {
        assert!(matches!(parse_command("uci").unwrap(), Command::Uci));
        assert!(matches!(parse_command("isready").unwrap(), Command::IsReady));
        assert!(matches!(parse_command("quit").unwrap(), Command::Quit));
        assert!(matches!(parse_command("stop").unwrap(), Command::Stop));
        assert!(matches!(parse_command("ponderhit").unwrap(), Command::PonderHit));
        assert!(matches!(parse_command("ucinewgame").unwrap(), Command::UciNewGame));
        assert!(matches!(parse_command("d").unwrap(), Command::Display));
    }

    #[test]
    fn parse_position_startpos_with_moves() {
        let pos = play("position startpos moves e2e4 e7e5").unwrap();
        assert_eq!(
            pos.to_string(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2"
        );
    }

    #[test]
    fn parse_position_fen() {
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        let pos = play(&format!("position fen {fen}")).unwrap();
        assert_eq!(pos.to_string(), fen);

        let pos = play("position fen 4k3/8/8/8/8/8/8/4K2R w K - moves e1g1").unwrap();
        assert_eq!(pos.to_string(), "4k3/8/8/8/8/8/8/5RK1 b - - 1 1");
    }

    #[test]
    fn illegal_move_stops_the_sequence() {
        let Command::Position(cmd) = parse_command("position startpos moves e2e4 e2e4 d7d5").unwrap() else {
            panic!("expected Position");
        };
        let mut pos = Position::startpos();
        let mut reps = RepTable::new();
        let err = cmd.play(&mut pos, &mut reps).unwrap_err();
        assert!(matches!(err, UciError::IllegalMove { ref uci_move, .. } if uci_move == "e2e4"));
        // The first move stands.
        assert_eq!(pos.side_to_move(), ochre_core::Color::Black);
        assert!(reps.exists(pos.key()));
    }

    #[test]
    fn played_positions_are_recorded() {
        let Command::Position(cmd) = parse_command("position startpos moves g1f3 g8f6 f3g1 f6g8").unwrap() else {
            panic!("expected Position");
        };
        let mut pos = Position::startpos();
        let mut reps = RepTable::new();
        cmd.play(&mut pos, &mut reps).unwrap();
        reps.remove(pos.key());
        // The start position occurred twice.
        assert!(reps.exists(pos.key()));
    }

    #[test]
    fn parse_position_errors() {
        assert!(matches!(parse_command("position"), Err(UciError::MalformedPosition)));
        assert!(matches!(parse_command("position moves e2e4"), Err(UciError::MalformedPosition)));
        assert!(matches!(parse_command("position fen"), Err(UciError::MalformedPosition)));
        assert!(matches!(parse_command("position fen invalid"), Err(UciError::InvalidFen { .. })));
    }

    #[test]
    fn parse_go_depth() {
        let Command::Go(params) = parse_command("go depth 6").unwrap() else {
            panic!("expected Go");
        };
        assert_eq!(params.depth, Some(6));
        assert_eq!(params.limits().max_depth(), 6);
    }

    #[test]
    fn parse_go_bare_defaults() {
        let Command::Go(params) = parse_command("go").unwrap() else {
            panic!("expected Go");
        };
        assert_eq!(params, GoParams::default());
    }

    #[test]
    fn parse_go_clock() {
        let Command::Go(params) =
            parse_command("go wtime 300000 btime -20 winc 2000 binc 2000 movestogo 20").unwrap()
        else {
            panic!("expected Go");
        };
        assert_eq!(params.wtime, Some(Duration::from_millis(300000)));
        assert_eq!(params.btime, Some(Duration::ZERO));
        assert_eq!(params.winc, Some(Duration::from_millis(2000)));
        assert_eq!(params.binc, Some(Duration::from_millis(2000)));
        assert_eq!(params.movestogo, Some(20));
    }

    #[test]
    fn parse_go_flags() {
        let Command::Go(params) = parse_command("go ponder movetime 5000 infinite").unwrap() else {
            panic!("expected Go");
        };
        assert!(params.ponder);
        assert!(params.infinite);
        assert_eq!(params.movetime, Some(Duration::from_millis(5000)));
    }

    #[test]
    fn parse_go_errors() {
        assert!(matches!(parse_command("go wtime"), Err(UciError::MissingGoValue { .. })));
        assert!(matches!(parse_command("go depth abc"), Err(UciError::InvalidGoValue { .. })));
    }

    #[test]
    fn parse_setoption() {
        assert!(matches!(
            parse_command("setoption name Hash value 64").unwrap(),
            Command::SetOption(UciOption::Hash(64))
        ));
        assert!(matches!(
            parse_command("setoption name Ponder value true").unwrap(),
            Command::SetOption(UciOption::Ponder(true))
        ));
        assert!(matches!(
            parse_command("setoption name Hash value 4096"),
            Err(UciError::InvalidOptionValue { .. })
        ));
        assert!(matches!(
            parse_command("setoption name Threads value 4"),
            Err(UciError::UnknownOption { .. })
        ));
        assert!(matches!(parse_command("setoption Hash"), Err(UciError::MalformedOption)));
    }

    #[test]
    fn parse_cache_and_book_options() {
        assert!(matches!(
            parse_command("setoption name EvalHash value 4").unwrap(),
            Command::SetOption(UciOption::EvalHash(4))
        ));
        assert!(matches!(
            parse_command("setoption name PawnHash value 32").unwrap(),
            Command::SetOption(UciOption::PawnHash(32))
        ));
        assert!(matches!(
            parse_command("setoption name PawnHash value 0"),
            Err(UciError::InvalidOptionValue { .. })
        ));
        assert!(matches!(
            parse_command("setoption name EvalHash value 33"),
            Err(UciError::InvalidOptionValue { .. })
        ));
        assert!(matches!(
            parse_command("setoption name OwnBook value false").unwrap(),
            Command::SetOption(UciOption::OwnBook(false))
        ));
        match parse_command("setoption name BookFile value /tmp/My Books/main.bin").unwrap() {
            Command::SetOption(UciOption::BookFile(path)) => assert_eq!(path, "/tmp/My Books/main.bin"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            parse_command("setoption name BookFile"),
            Err(UciError::InvalidOptionValue { .. })
        ));
    }

    #[test]
    fn parse_perft_commands() {
        assert!(matches!(parse_command("perft 3").unwrap(), Command::Perft(3)));
        assert!(matches!(parse_command("divide 2").unwrap(), Command::Divide(2)));
        assert!(matches!(parse_command("perft"), Err(UciError::InvalidPerftDepth { .. })));
        assert!(matches!(parse_command("perft 0"), Err(UciError::InvalidPerftDepth { .. })));
    }

    #[test]
    fn parse_unknown_and_empty() {
        assert!(matches!(parse_command("foobar").unwrap(), Command::Unknown(_)));
        assert!(matches!(parse_command("").unwrap(), Command::Unknown(_)));
    }
}
