use std::io::{self, BufRead, Write};

use fairy_chess_core::{Game, PieceType, Square};

/// Red background on the squares the selected piece can reach.
const HINT: &str = "\x1B[1;41m";
/// Yellow background on own pieces the opponent can reach.
const THREAT: &str = "\x1B[1;43m";
const RESET: &str = "\x1B[0m";

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut game = Game::new();

    println!("Fairy chess. Enter squares like 'e2'; 'undo' takes a move back, 'exit' quits.");
    loop {
        render(&game, &[]);
        println!("{} to move.", game.current_player());
        if game.is_in_check(game.current_player()) {
            println!("Check! Keep your king safe.");
        }

        let Some(input) = prompt(&mut lines, "Square of the piece to move: ")? else {
            break;
        };
        match input.as_str() {
            "" => continue,
            "exit" => {
                println!("Game over!");
                break;
            }
            "undo" => {
                if let Err(error) = game.undo() {
                    println!("{error}.");
                }
                continue;
            }
            _ => {}
        }
        let Some(from) = parse_square(&input) else {
            println!("Enter coordinates like 'e2'.");
            continue;
        };
        let Some(piece) = game.board().get(from) else {
            println!("There is no piece on that square.");
            continue;
        };
        if piece.color != game.current_player() {
            println!("That piece belongs to your opponent.");
            continue;
        }
        println!("Selected piece: {piece}");
        let hints: Vec<Square> = game
            .possible_moves(from)
            .iter()
            .map(|candidate| candidate.to)
            .collect();
        render(&game, &hints);

        let Some(input) = prompt(&mut lines, "Square to move to: ")? else {
            break;
        };
        if input.is_empty() {
            continue;
        }
        let Some(to) = parse_square(&input) else {
            println!("Enter coordinates like 'e4'.");
            continue;
        };
        match game.commit_move(from, to) {
            Ok(None) => println!("{} -> {}", format_square(from), format_square(to)),
            Ok(Some(_)) => {
                render(&game, &[]);
                let Some(answer) = prompt(
                    &mut lines,
                    "The pawn reached the edge! Replace it with (R/B/Q/N): ",
                )?
                else {
                    break;
                };
                // an unrecognized letter leaves the pawn as it is
                game.promote(parse_promotion(&answer).unwrap_or(PieceType::Pawn));
            }
            Err(error) => println!("{error}."),
        }
    }
    Ok(())
}

fn prompt(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    message: &str,
) -> anyhow::Result<Option<String>> {
    print!("{message}");
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => Ok(Some(line?.trim().to_lowercase())),
        None => Ok(None),
    }
}

fn render(game: &Game, hints: &[Square]) {
    let threatened = game.threatened_squares(game.current_player());
    println!("   A B C D E F G H");
    println!(" +-----------------+");
    for rank in 0..8i8 {
        print!("{}| ", 8 - rank);
        for file in 0..8i8 {
            let square = Square::new(rank, file);
            let glyph = game.board().get(square).map_or('.', |piece| piece.glyph());
            if hints.contains(&square) {
                print!("{HINT}{glyph}{RESET} ");
            } else if threatened.contains(&square) {
                print!("{THREAT}{glyph}{RESET} ");
            } else {
                print!("{glyph} ");
            }
        }
        println!("|{}", 8 - rank);
    }
    println!(" +-----------------+");
    println!("   A B C D E F G H");
}

fn parse_square(input: &str) -> Option<Square> {
    let mut chars = input.chars();
    let file = chars.next()?;
    let digit = chars.next()?.to_digit(10)?;
    if chars.next().is_some() || !('a'..='h').contains(&file) || !(1..=8).contains(&digit) {
        return None;
    }
    Some(Square::new(8 - digit as i8, file as i8 - 'a' as i8))
}

fn format_square(square: Square) -> String {
    format!("{}{}", (b'a' + square.file as u8) as char, 8 - square.rank)
}

fn parse_promotion(input: &str) -> Option<PieceType> {
    match input {
        "r" => Some(PieceType::Rook),
        "b" => Some(PieceType::Bishop),
        "q" => Some(PieceType::Queen),
        "n" => Some(PieceType::Knight),
        _ => None,
    }
}
