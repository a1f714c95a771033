use std::{
    fmt,
    io::{self, BufRead, Write},
};

use clap::{App, Arg, ArgMatches};
use once_cell::sync::Lazy;
use rand::{rngs::StdRng, Rng, SeedableRng};
use regex::Regex;

use broadside::{
    AttackOutcome, Board, CannotAttackReason, CannotPlaceReason, Cell, Coordinate, Dimensions,
    Fleet, Match, Orientation, Side, Strategy,
};

mod logging;

const STRATEGY_NAMES: &[&str] = &["random", "hunt-track", "hunt-parity"];

fn main() -> io::Result<()> {
    logging::init_logging();

    let matches = App::new("Broadside")
        .version("1.0")
        .about("Command line naval combat, against a bot or bot versus bot.")
        .arg(
            Arg::with_name("auto")
                .short("a")
                .long("auto")
                .value_name("STRATEGY")
                .help("watch a bot with this strategy play side A instead of playing yourself")
                .takes_value(true)
                .possible_values(STRATEGY_NAMES)
                .case_insensitive(true),
        )
        .arg(
            Arg::with_name("strategy")
                .short("s")
                .long("strategy")
                .value_name("STRATEGY")
                .help("strategy for the opposing bot")
                .takes_value(true)
                .default_value("hunt-parity")
                .possible_values(STRATEGY_NAMES)
                .case_insensitive(true),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .value_name("SEED")
                .help("seed the random number generator for a reproducible game")
                .takes_value(true)
                .validator(|v| v.parse::<u64>().map(|_| ()).map_err(|e| e.to_string())),
        )
        .arg(
            Arg::with_name("pause")
                .short("p")
                .long("pause")
                .help("in auto mode, wait for enter between turns"),
        )
        .get_matches();

    let mut rng = match matches.value_of("seed") {
        // The validator already accepted this value.
        Some(seed) => StdRng::seed_from_u64(seed.parse().unwrap()),
        None => StdRng::from_entropy(),
    };
    let fleet = standard_fleet();
    let opponent = parse_strategy(matches.value_of("strategy").unwrap());

    match matches.value_of("auto") {
        Some(name) => auto_game(fleet, parse_strategy(name), opponent, &matches, &mut rng),
        None => human_game(fleet, opponent, &mut rng),
    }
}

/// The classic lineup on a 10x10 board.
fn standard_fleet() -> Fleet {
    let mut fleet = Fleet::new(Dimensions::new(10, 10));
    // The catalog is well-formed by construction.
    fleet.add_ship(5, 'a', "aircraft carrier").unwrap();
    fleet.add_ship(4, 'b', "battleship").unwrap();
    fleet.add_ship(3, 'd', "destroyer").unwrap();
    fleet.add_ship(3, 's', "submarine").unwrap();
    fleet.add_ship(2, 'p', "patrol boat").unwrap();
    fleet
}

fn parse_strategy(name: &str) -> Strategy {
    match name.to_ascii_lowercase().as_str() {
        "random" => Strategy::random(),
        "hunt-track" => Strategy::hunt_track(),
        "hunt-parity" => Strategy::hunt_parity(),
        // Guarded by clap's possible_values.
        _ => unreachable!(),
    }
}

fn side_name(side: Side) -> &'static str {
    match side {
        Side::A => "Side A",
        Side::B => "Side B",
    }
}

/// Run a full bot-versus-bot match, narrating every turn.
fn auto_game(
    fleet: Fleet,
    side_a: Strategy,
    side_b: Strategy,
    matches: &ArgMatches,
    rng: &mut StdRng,
) -> io::Result<()> {
    let pause = matches.is_present("pause");
    let stdin = io::stdin();
    let mut input = InputReader::new(stdin.lock());

    let mut game = Match::new(fleet, side_a, side_b);
    if let Err(err) = game.setup(rng) {
        eprintln!("setup failed: {}", err);
        std::process::exit(1);
    }

    let winner = loop {
        let turn = game.play_turn(rng);
        narrate(game.fleet(), side_name(turn.attacker), turn.coord, turn.outcome);
        if let Some(winner) = turn.winner {
            break winner;
        }
        if pause {
            input.read_input("(enter to continue)", |_| Some(()))?;
        }
    };

    println!();
    for &side in &[Side::A, Side::B] {
        println!("{}'s board:", side_name(side));
        show_board(game.board(side), game.fleet(), false);
        println!();
    }
    println!("{} wins!", side_name(winner));
    Ok(())
}

/// Interactive game: the player places and fires by hand against a bot.
fn human_game(fleet: Fleet, bot: Strategy, rng: &mut StdRng) -> io::Result<()> {
    let stdin = io::stdin();
    let mut input = InputReader::new(stdin.lock());
    let dim = fleet.dimensions();

    let mut own = Board::new(dim);
    let mut enemy = Board::new(dim);
    let mut bot = bot;
    if let Err(err) = bot.place_fleet(&mut enemy, &fleet, rng) {
        eprintln!("the bot could not place its fleet: {}", err);
        std::process::exit(1);
    }
    place_by_hand(&mut own, &fleet, &mut input, rng)?;

    println!();
    println!("Your board:");
    show_board(&own, &fleet, false);

    loop {
        println!();
        println!("Enemy waters:");
        show_board(&enemy, &fleet, true);
        let coord = read_attack(&mut input, &enemy)?;
        let outcome = match enemy.attack(coord) {
            Ok(outcome) => outcome,
            // read_attack only accepts fresh in-bounds cells.
            Err(_) => unreachable!(),
        };
        narrate(&fleet, "You", coord, Some(outcome));
        if enemy.all_destroyed() {
            println!("You win!");
            return Ok(());
        }

        let coord = bot.choose_attack(dim, rng);
        let outcome = own.attack(coord).ok();
        bot.observe_outcome(coord, outcome);
        narrate(&fleet, "The enemy", coord, outcome);
        if own.all_destroyed() {
            println!();
            println!("Your board:");
            show_board(&own, &fleet, false);
            println!("You lose.");
            return Ok(());
        }
    }
}

/// Matcher for "row,col" or "row col", optionally followed by h/v.
static COORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<row>[0-9]+)(?:\s*,\s*|\s+)(?P<col>[0-9]+)(?:\s+(?P<dir>[hv])\w*)?$")
        // The pattern is a constant.
        .unwrap()
});

/// Prompt the player for each ship's placement in catalog order. Typing
/// "auto" hands the remaining ships to random placement.
fn place_by_hand(
    board: &mut Board,
    fleet: &Fleet,
    input: &mut InputReader<impl BufRead>,
    rng: &mut impl Rng,
) -> io::Result<()> {
    println!("Place your ships as \"row,col h\" or \"row,col v\"; \"auto\" places the rest.");
    for ship in 0..fleet.ship_count() {
        println!();
        println!("Your board so far:");
        show_board(board, fleet, false);
        let auto_filled = loop {
            let prompt = format!(
                "Place the {} (length {}):",
                fleet.name(ship),
                fleet.length(ship)
            );
            enum Request {
                At(Coordinate, Orientation),
                Auto,
            }
            let request = input.read_input_lower(&prompt, |line| {
                if let "auto" | "random" | "rand" = line {
                    return Some(Request::Auto);
                }
                let captures = match COORD.captures(line) {
                    Some(captures) => captures,
                    None => {
                        println!("Type a placement like \"3,4 h\", or \"auto\".");
                        return None;
                    }
                };
                let row = captures.name("row").unwrap().as_str().parse().ok()?;
                let col = captures.name("col").unwrap().as_str().parse().ok()?;
                let orient = match captures.name("dir").map(|d| d.as_str()) {
                    Some("h") => Orientation::Horizontal,
                    Some("v") => Orientation::Vertical,
                    _ => {
                        println!("Add an orientation: h or v.");
                        return None;
                    }
                };
                Some(Request::At(Coordinate::new(row, col), orient))
            })?;
            match request {
                Request::Auto => {
                    randomize_rest(board, fleet, rng);
                    break true;
                }
                Request::At(anchor, orient) => {
                    match board.place_ship(fleet, anchor, ship, orient) {
                        Ok(()) => break false,
                        Err(CannotPlaceReason::OutOfBounds) => {
                            println!("That anchor is off the board.")
                        }
                        Err(CannotPlaceReason::FootprintExceedsGrid) => {
                            println!("The ship would run off the board from there.")
                        }
                        Err(CannotPlaceReason::CellOccupied) => {
                            println!("That overlaps another ship.")
                        }
                        // Ships are placed once each, in catalog order.
                        Err(_) => unreachable!(),
                    }
                }
            }
        };
        if auto_filled {
            break;
        }
    }
    Ok(())
}

/// Randomly place every ship the board does not hold yet.
fn randomize_rest(board: &mut Board, fleet: &Fleet, rng: &mut impl Rng) {
    for ship in 0..fleet.ship_count() {
        if board.remaining_cells(ship) > 0 {
            continue;
        }
        loop {
            let anchor = board.dimensions().random_coordinate(rng);
            let orient = if rng.gen::<bool>() {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            if board.place_ship(fleet, anchor, ship, orient).is_ok() {
                break;
            }
        }
    }
}

/// Prompt for an attack coordinate until the player names a cell the board
/// will accept.
fn read_attack(
    input: &mut InputReader<impl BufRead>,
    enemy: &Board,
) -> io::Result<Coordinate> {
    input.read_input_lower("Fire at (row,col):", |line| {
        let captures = match COORD.captures(line) {
            Some(captures) => captures,
            None => {
                println!("Type a target like \"3,4\".");
                return None;
            }
        };
        let row = captures.name("row").unwrap().as_str().parse().ok()?;
        let col = captures.name("col").unwrap().as_str().parse().ok()?;
        let coord = Coordinate::new(row, col);
        match probe(enemy, coord) {
            Ok(()) => Some(coord),
            Err(CannotAttackReason::OutOfBounds) => {
                println!("That cell is off the board.");
                None
            }
            Err(CannotAttackReason::AlreadyAttacked) => {
                println!("You already fired there.");
                None
            }
        }
    })
}

/// Check whether an attack at `coord` would be accepted, without resolving it.
fn probe(board: &Board, coord: Coordinate) -> Result<(), CannotAttackReason> {
    match board.cell(coord) {
        None => Err(CannotAttackReason::OutOfBounds),
        Some(Cell::Hit(_)) | Some(Cell::Miss) => Err(CannotAttackReason::AlreadyAttacked),
        Some(_) => Ok(()),
    }
}

/// Describe one shot the way a naval observer would.
fn narrate(fleet: &Fleet, who: &str, coord: Coordinate, outcome: Option<AttackOutcome>) {
    match outcome {
        None => println!("{} wasted a shot at {}.", who, coord),
        Some(AttackOutcome::Miss) => println!("{} attacked {} and missed.", who, coord),
        Some(AttackOutcome::Hit(_)) => {
            println!("{} attacked {} and hit something.", who, coord)
        }
        Some(AttackOutcome::Sunk(id)) => println!(
            "{} attacked {} and destroyed the {}.",
            who,
            coord,
            fleet.name(id)
        ),
    }
}

/// Print a board grid. With `shots_only`, intact ships render as open water
/// so the enemy board gives nothing away.
fn show_board(board: &Board, fleet: &Fleet, shots_only: bool) {
    struct Glyph(char);
    impl fmt::Display for Glyph {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            let mut buf = [0u8; 4];
            f.pad(self.0.encode_utf8(&mut buf))
        }
    }
    let rows = board.iter_rows().map(|row| {
        row.map(|cell| {
            Glyph(match cell {
                Cell::Empty => '.',
                Cell::Blocked => '#',
                Cell::Ship(_) if shots_only => '.',
                Cell::Ship(id) => fleet.symbol(id),
                Cell::Hit(_) => 'X',
                Cell::Miss => 'o',
            })
        })
    });
    print!("   ");
    for col in 0..board.dimensions().cols() {
        print!("{:^3}", col);
    }
    println!();
    for (row, cells) in rows.enumerate() {
        print!("{:>2} ", row);
        for cell in cells {
            print!("{:^3}", cell);
        }
        println!();
    }
}

/// Helper to read input from the player.
struct InputReader<B> {
    read: B,
    buf: String,
}

impl<B> InputReader<B> {
    fn new(read: B) -> Self {
        Self {
            read,
            buf: String::new(),
        }
    }
}

impl<B: BufRead> InputReader<B> {
    /// Repeatedly tries to read input until the input checker returns `Some`.
    /// Converts to ascii lower before running the checker.
    fn read_input_lower<F, T>(&mut self, prompt: &str, mut checker: F) -> io::Result<T>
    where
        F: FnMut(&str) -> Option<T>,
    {
        loop {
            self.read_input_inner(prompt)?;
            self.buf.make_ascii_lowercase();
            if let Some(val) = checker(self.buf.trim()) {
                return Ok(val);
            }
        }
    }

    /// Repeatedly tries to read input until the input checker returns `Some`.
    fn read_input<F, T>(&mut self, prompt: &str, mut checker: F) -> io::Result<T>
    where
        F: FnMut(&str) -> Option<T>,
    {
        loop {
            self.read_input_inner(prompt)?;
            if let Some(val) = checker(self.buf.trim()) {
                return Ok(val);
            }
        }
    }

    /// Helper to print the prompt, clear the string buffer and read a line.
    fn read_input_inner(&mut self, prompt: &str) -> io::Result<()> {
        print!("{} ", prompt);
        io::stdout().flush()?;
        self.buf.clear();
        if self.read.read_line(&mut self.buf)? == 0 {
            println!();
            std::process::exit(0);
        }
        Ok(())
    }
}
