//! Event-driven UCI engine with pondering support.

use std::collections::VecDeque;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, PoisonError, mpsc};
use std::time::Instant;

use tracing::{debug, error, info, warn};

use ochre_core::perft::{divide, perft};
use ochre_core::{Move, Position, STARTING_FEN};
use ochre_engine::eval::DEFAULT_CACHE_MB;
use ochre_engine::search::DEFAULT_HASH_MB;
use ochre_engine::{Evaluator, RepTable, SearchControl, SearchResult, Searcher, mate_in};

use crate::book::Book;
use crate::command::{Command, GoParams, PositionCommand, UciOption, parse_command};
use crate::error::UciError;

/// Stack size of the search thread; every ply keeps its move lists on it.
const SEARCH_STACK_BYTES: usize = 64 * 1024 * 1024;

/// Configuration knobs adjustable via `setoption`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Transposition table size in megabytes.
    pub hash_mb: usize,
    pub ponder: bool,
    /// Evaluation cache size in megabytes.
    pub eval_hash_mb: usize,
    /// Pawn structure cache size in megabytes.
    pub pawn_hash_mb: usize,
    /// Play from the opening book while the game is still in it.
    pub own_book: bool,
    pub book_file: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hash_mb: DEFAULT_HASH_MB,
            ponder: false,
            eval_hash_mb: DEFAULT_CACHE_MB,
            pawn_hash_mb: DEFAULT_CACHE_MB,
            own_book: false,
            book_file: None,
        }
    }
}

impl EngineConfig {
    fn searcher(&self) -> Searcher {
        Searcher::with_tables(self.hash_mb, self.evaluator())
    }

    fn evaluator(&self) -> Evaluator {
        Evaluator::new(self.eval_hash_mb, self.pawn_hash_mb)
    }
}

/// Internal engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EngineState {
    Idle,
    /// A search whose `bestmove` goes out as soon as it finishes.
    Searching,
    /// `go ponder`: `bestmove` waits for `ponderhit` or `stop`.
    Pondering,
    /// `go infinite`: `bestmove` waits for `stop`.
    Infinite,
}

/// Events processed by the main engine loop.
enum EngineEvent {
    UciCommand(Result<Command, UciError>),
    SearchDone(SearchDone),
    InputClosed,
    InputFailed(io::Error),
}

/// Payload returned by the search thread when it finishes.
struct SearchDone {
    result: SearchResult,
    searcher: Searcher,
    reps: RepTable,
}

/// Line-oriented protocol output shared with the search thread.
#[derive(Clone)]
struct Output(Arc<Mutex<Box<dyn Write + Send>>>);

impl Output {
    fn new(writer: impl Write + Send + 'static) -> Self {
        Output(Arc::new(Mutex::new(Box::new(writer))))
    }

    fn line(&self, args: fmt::Arguments<'_>) {
        let mut writer = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(writer, "{args}").and_then(|()| writer.flush()) {
            error!(error = %e, "failed to write UCI output");
        }
    }
}

macro_rules! send {
    ($out:expr, $($arg:tt)*) => {
        $out.line(format_args!($($arg)*))
    };
}

/// The UCI engine, holding the game position and the search tables.
///
/// Runs an event-driven loop on the calling thread, dispatching searches
/// to a worker thread and processing UCI commands concurrently. While a
/// search runs, commands that need the tables are queued and replayed once
/// it hands them back.
pub struct UciEngine {
    position: Position,
    /// Every position of the game so far; `None` while lent to a search.
    reps: Option<RepTable>,
    searcher: Option<Searcher>,
    state: EngineState,
    control: Option<Arc<SearchControl>>,
    /// Result of a ponder or infinite search that finished before the GUI
    /// asked for it.
    held: Option<SearchResult>,
    queued: VecDeque<Command>,
    book: Option<Book>,
    /// Cleared by a book miss or a game that did not start from the
    /// standard position; set again by `ucinewgame`.
    in_book: bool,
    config: EngineConfig,
    out: Output,
}

impl UciEngine {
    /// Create a new engine with the starting position.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let position = Position::startpos();
        let mut reps = RepTable::new();
        reps.record(position.key());
        let mut engine = Self {
            position,
            reps: Some(reps),
            searcher: Some(config.searcher()),
            state: EngineState::Idle,
            control: None,
            held: None,
            queued: VecDeque::new(),
            book: None,
            in_book: true,
            config,
            out: Output::new(io::stdout()),
        };
        engine.load_book();
        engine
    }

    /// Run the UCI event loop on stdin and stdout until `quit` or input closes.
    pub fn run(self) -> Result<(), UciError> {
        self.run_with(io::BufReader::new(io::stdin()), io::stdout())
    }

    /// Run the UCI event loop on the given input and output.
    pub fn run_with(
        mut self,
        input: impl BufRead + Send + 'static,
        output: impl Write + Send + 'static,
    ) -> Result<(), UciError> {
        self.out = Output::new(output);
        let (tx, rx) = mpsc::channel::<EngineEvent>();

        let input_tx = tx.clone();
        std::thread::Builder::new()
            .name("uci-input".to_string())
            .spawn(move || read_input(input, &input_tx))?;

        let mut input_open = true;
        for event in &rx {
            match event {
                EngineEvent::UciCommand(Ok(Command::Quit)) => {
                    self.stop_search();
                    self.wait_for_search(&rx);
                    break;
                }
                EngineEvent::UciCommand(Ok(cmd)) => self.handle_command(cmd, &tx),
                EngineEvent::UciCommand(Err(e)) => {
                    warn!(error = %e, "UCI parse error");
                }
                EngineEvent::SearchDone(done) => {
                    self.search_done(done, &tx);
                    if !input_open {
                        self.stop_unbounded();
                        if self.state == EngineState::Idle {
                            break;
                        }
                    }
                }
                EngineEvent::InputFailed(e) => {
                    // Nothing more can be read: finish like a `stop` then `quit`.
                    error!(error = %e, "failed to read UCI input");
                    self.stop_search();
                    self.wait_for_search(&rx);
                    break;
                }
                EngineEvent::InputClosed => {
                    input_open = false;
                    self.stop_unbounded();
                    if self.state == EngineState::Idle {
                        break;
                    }
                }
            }
        }

        info!("ochre shutting down");
        Ok(())
    }

    fn is_busy(&self) -> bool {
        self.state != EngineState::Idle
    }

    fn handle_command(&mut self, cmd: Command, tx: &mpsc::Sender<EngineEvent>) {
        match cmd {
            Command::Uci => self.handle_uci(),
            Command::IsReady => send!(self.out, "readyok"),
            Command::PonderHit => {
                self.handle_ponderhit();
                self.replay_queued(tx);
            }
            Command::Stop => {
                self.stop_search();
                self.replay_queued(tx);
            }
            Command::Unknown(name) => {
                if !name.is_empty() {
                    debug!(cmd = %name, "ignoring unknown command");
                }
            }
            Command::Quit => {}
            cmd if self.is_busy() => {
                debug!(?cmd, "search running, command queued");
                self.queued.push_back(cmd);
            }
            Command::UciNewGame => self.handle_ucinewgame(),
            Command::SetOption(option) => self.handle_setoption(option),
            Command::Position(cmd) => self.handle_position(&cmd),
            Command::Go(params) => self.handle_go(&params, tx),
            Command::Perft(depth) => self.handle_perft(depth),
            Command::Divide(depth) => self.handle_divide(depth),
            Command::Display => {
                send!(self.out, "{}", self.position.pretty());
                send!(self.out, "Fen: {}", self.position);
                send!(self.out, "Key: {:016x}", self.position.key());
            }
        }
    }

    fn handle_uci(&self) {
        send!(self.out, "id name ochre");
        send!(self.out, "id author the ochre developers");
        send!(
            self.out,
            "option name Hash type spin default {DEFAULT_HASH_MB} min 1 max 1024"
        );
        send!(
            self.out,
            "option name EvalHash type spin default {DEFAULT_CACHE_MB} min 1 max 32"
        );
        send!(
            self.out,
            "option name PawnHash type spin default {DEFAULT_CACHE_MB} min 1 max 32"
        );
        send!(self.out, "option name Ponder type check default false");
        send!(self.out, "option name OwnBook type check default false");
        send!(self.out, "option name BookFile type string default <empty>");
        send!(self.out, "uciok");
    }

    fn handle_ucinewgame(&mut self) {
        self.position = Position::startpos();
        if let Some(reps) = self.reps.as_mut() {
            reps.clear();
            reps.record(self.position.key());
        }
        if let Some(searcher) = self.searcher.as_mut() {
            searcher.clear();
        }
        self.in_book = true;
    }

    fn handle_setoption(&mut self, option: UciOption) {
        match option {
            UciOption::Hash(mb) => {
                self.config.hash_mb = mb;
                if let Some(searcher) = self.searcher.as_mut() {
                    searcher.resize_tt(mb);
                }
                info!(mb, "transposition table resized");
            }
            UciOption::EvalHash(mb) => {
                self.config.eval_hash_mb = mb;
                self.rebuild_evaluator();
            }
            UciOption::PawnHash(mb) => {
                self.config.pawn_hash_mb = mb;
                self.rebuild_evaluator();
            }
            UciOption::Ponder(ponder) => {
                // Pondering itself is driven by `go ponder`.
                self.config.ponder = ponder;
            }
            UciOption::OwnBook(own_book) => {
                self.config.own_book = own_book;
                self.load_book();
            }
            UciOption::BookFile(path) => {
                self.config.book_file = Some(PathBuf::from(path));
                self.book = None;
                self.load_book();
            }
        }
    }

    fn rebuild_evaluator(&mut self) {
        if let Some(searcher) = self.searcher.as_mut() {
            searcher.set_evaluator(self.config.evaluator());
        }
        info!(
            eval_mb = self.config.eval_hash_mb,
            pawn_mb = self.config.pawn_hash_mb,
            "evaluation caches resized"
        );
    }

    /// Load the configured book if `OwnBook` is on. A book that cannot be
    /// loaded turns `OwnBook` off.
    fn load_book(&mut self) {
        if !self.config.own_book || self.book.is_some() {
            return;
        }
        let Some(path) = &self.config.book_file else {
            warn!("OwnBook is on but no BookFile is set, turning it off");
            self.config.own_book = false;
            return;
        };
        match Book::open(path) {
            Ok(book) => {
                info!(path = %path.display(), entries = book.len(), "opening book loaded");
                self.book = Some(book);
            }
            Err(e) => {
                warn!(error = %e, "opening book unavailable, turning OwnBook off");
                self.config.own_book = false;
            }
        }
    }

    /// A move from the book for the current position, if the game is still
    /// in it.
    fn book_move(&mut self) -> Option<Move> {
        if !self.config.own_book || !self.in_book {
            return None;
        }
        let book = self.book.as_ref()?;
        let mut pos = self.position.clone();
        let mv = book.pick(&mut pos, &mut rand::thread_rng());
        if mv.is_none() {
            debug!("out of book");
            self.in_book = false;
        }
        mv
    }

    fn handle_position(&mut self, cmd: &PositionCommand) {
        let Some(reps) = self.reps.as_mut() else {
            return;
        };
        if cmd.start.to_string() != STARTING_FEN {
            self.in_book = false;
        }
        if let Err(e) = cmd.play(&mut self.position, reps) {
            warn!(error = %e, "ignoring the rest of the position command");
        }
    }

    fn handle_go(&mut self, params: &GoParams, tx: &mpsc::Sender<EngineEvent>) {
        if !params.ponder
            && !params.infinite
            && let Some(mv) = self.book_move()
        {
            info!(%mv, "playing book move");
            send!(self.out, "bestmove {mv}");
            return;
        }

        let (Some(mut searcher), Some(mut reps)) = (self.searcher.take(), self.reps.take()) else {
            warn!("go received without search tables, ignoring");
            return;
        };

        let limits = params.limits();
        let max_depth = limits.max_depth();
        let control = Arc::new(limits.control(
            self.position.side_to_move(),
            Arc::new(AtomicBool::new(false)),
        ));

        let mut pos = self.position.clone();
        let search_control = Arc::clone(&control);
        let out = self.out.clone();
        let tx = tx.clone();

        let spawned = std::thread::Builder::new()
            .name("search".to_string())
            .stack_size(SEARCH_STACK_BYTES)
            .spawn(move || {
                let result = searcher.search(
                    &mut pos,
                    max_depth,
                    &search_control,
                    &mut reps,
                    |depth, score, nodes, pv| {
                        report_iteration(&out, &search_control, depth, score, nodes, pv);
                    },
                );
                let _ = tx.send(EngineEvent::SearchDone(SearchDone {
                    result,
                    searcher,
                    reps,
                }));
            });

        if let Err(e) = spawned {
            error!(error = %e, "failed to start search thread");
            // The tables went down with the closure.
            self.searcher = Some(self.config.searcher());
            let mut reps = RepTable::new();
            reps.record(self.position.key());
            self.reps = Some(reps);
            send!(self.out, "bestmove 0000");
            return;
        }

        debug!(max_depth, ?limits, "search started");
        self.state = if params.ponder {
            EngineState::Pondering
        } else if params.infinite {
            EngineState::Infinite
        } else {
            EngineState::Searching
        };
        self.control = Some(control);
    }

    fn handle_ponderhit(&mut self) {
        if self.state != EngineState::Pondering {
            warn!("ponderhit received while not pondering, ignoring");
            return;
        }
        if let Some(control) = &self.control {
            control.activate();
        }
        self.state = EngineState::Searching;
        if let Some(result) = self.held.take() {
            self.report_best(&result);
        }
    }

    /// Ask a running search to stop and report its move, or report a held
    /// result right away.
    fn stop_search(&mut self) {
        match self.state {
            EngineState::Idle => {}
            EngineState::Searching => {
                if let Some(control) = &self.control {
                    control.stop();
                }
            }
            EngineState::Pondering | EngineState::Infinite => {
                if let Some(control) = &self.control {
                    control.stop();
                }
                self.state = EngineState::Searching;
                if let Some(result) = self.held.take() {
                    self.report_best(&result);
                }
            }
        }
    }

    /// With the input gone nobody will send `stop`; a bounded search still
    /// gets to report its move.
    fn stop_unbounded(&mut self) {
        if matches!(self.state, EngineState::Pondering | EngineState::Infinite) {
            self.stop_search();
        }
    }

    /// Block until the search thread hands the tables back.
    fn wait_for_search(&mut self, rx: &mpsc::Receiver<EngineEvent>) {
        if self.searcher.is_some() {
            return;
        }
        for event in rx {
            if let EngineEvent::SearchDone(done) = event {
                self.searcher = Some(done.searcher);
                self.reps = Some(done.reps);
                if self.state == EngineState::Searching {
                    self.report_best(&done.result);
                }
                return;
            }
        }
    }

    fn search_done(&mut self, done: SearchDone, tx: &mpsc::Sender<EngineEvent>) {
        self.searcher = Some(done.searcher);
        self.reps = Some(done.reps);

        match self.state {
            EngineState::Pondering | EngineState::Infinite => {
                debug!("search finished early, holding bestmove");
                self.held = Some(done.result);
            }
            _ => {
                self.report_best(&done.result);
                self.replay_queued(tx);
            }
        }
    }

    /// Print `bestmove` and return to idle.
    fn report_best(&mut self, result: &SearchResult) {
        if result.best_move.is_null() {
            send!(self.out, "bestmove 0000");
        } else {
            match result.ponder_move {
                Some(pm) => send!(self.out, "bestmove {} ponder {}", result.best_move.to_uci(), pm.to_uci()),
                None => send!(self.out, "bestmove {}", result.best_move.to_uci()),
            }
        }
        info!(
            depth = result.depth,
            score = result.score,
            nodes = result.nodes,
            "search finished"
        );
        self.control = None;
        if self.searcher.is_some() {
            self.state = EngineState::Idle;
        }
    }

    fn replay_queued(&mut self, tx: &mpsc::Sender<EngineEvent>) {
        while !self.is_busy()
            && let Some(cmd) = self.queued.pop_front()
        {
            self.handle_command(cmd, tx);
        }
    }

    fn handle_perft(&mut self, depth: usize) {
        let start = Instant::now();
        let nodes = perft(&mut self.position, depth);
        send!(self.out, "Nodes: {nodes}");
        send!(self.out, "Time: {} ms", start.elapsed().as_millis());
    }

    fn handle_divide(&mut self, depth: usize) {
        let start = Instant::now();
        let counts = divide(&mut self.position, depth);
        for (mv, nodes) in &counts {
            send!(self.out, "{mv}: {nodes}");
        }
        let total: u64 = counts.iter().map(|(_, nodes)| nodes).sum();
        send!(self.out, "");
        send!(self.out, "Moves: {}", counts.len());
        send!(self.out, "Nodes: {total}");
        send!(self.out, "Time: {} ms", start.elapsed().as_millis());
    }
}

impl Default for UciEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Forward input lines to the engine loop until the input ends or the loop
/// goes away.
fn read_input(input: impl BufRead, tx: &mpsc::Sender<EngineEvent>) {
    for line in input.lines() {
        let event = match line {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                debug!(cmd = %trimmed, "received UCI command");
                EngineEvent::UciCommand(parse_command(trimmed))
            }
            Err(e) => {
                let _ = tx.send(EngineEvent::InputFailed(e));
                return;
            }
        };
        if tx.send(event).is_err() {
            return;
        }
    }
    let _ = tx.send(EngineEvent::InputClosed);
}

/// Print the `info` line for a completed iteration.
fn report_iteration(
    out: &Output,
    control: &SearchControl,
    depth: i32,
    score: i32,
    nodes: u64,
    pv: &[Move],
) {
    let elapsed_ms = control.elapsed().as_millis().max(1);
    let nps = (nodes as u128 * 1000) / elapsed_ms;
    let score = match mate_in(score) {
        Some(moves) => format!("mate {moves}"),
        None => format!("cp {score}"),
    };
    let pv = pv
        .iter()
        .filter(|m| !m.is_null())
        .map(|m| m.to_uci())
        .collect::<Vec<_>>()
        .join(" ");
    send!(
        out,
        "info depth {depth} score {score} nodes {nodes} nps {nps} time {elapsed_ms} pv {pv}"
    );
}
