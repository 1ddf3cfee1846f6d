use clap::Parser;
use panel_layout::solver::Solver;
use panel_layout::types::{Demand, LARGE_BOARD, Rect, STANDARD_BOARD, SheetSpec, expand_demands};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "panel_layout",
    about = "Lay out rectangular panels on stock boards"
)]
struct Cli {
    /// Board size: WxH, `standard` (2800x2070) or `large` (3050x1830)
    #[arg(long, default_value = "standard", value_parser = parse_board)]
    board: Rect,

    /// Pieces as WxH or WxH:qty (e.g. 1200x800:5 504x769)
    #[arg(long = "pieces", num_args = 1..)]
    pieces: Vec<String>,

    /// Blade kerf in mm, added to every piece
    #[arg(long, default_value_t = 0.0)]
    kerf: f64,

    /// Print the solution as JSON
    #[arg(long)]
    json: bool,

    /// Log packing decisions to stderr
    #[arg(long)]
    verbose: bool,
}

fn parse_board(s: &str) -> Result<Rect, String> {
    match s {
        "standard" => Ok(STANDARD_BOARD),
        "large" => Ok(LARGE_BOARD),
        _ => parse_dimensions(s),
    }
}

fn parse_dimensions(s: &str) -> Result<Rect, String> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        return Err(format!("invalid dimensions '{}', expected WxH", s));
    }
    let w = parts[0]
        .parse::<u32>()
        .map_err(|_| format!("invalid width in '{}'", s))?;
    let h = parts[1]
        .parse::<u32>()
        .map_err(|_| format!("invalid height in '{}'", s))?;
    if w == 0 || h == 0 {
        return Err(format!("dimensions must be non-zero in '{}'", s));
    }
    Ok(Rect::new(w, h))
}

fn parse_piece(s: &str) -> Result<Demand, String> {
    let (dims, qty) = match s.split_once(':') {
        Some((dims, qty)) => {
            let qty = qty
                .parse::<u32>()
                .map_err(|_| format!("invalid quantity in '{}'", s))?;
            (dims, qty)
        }
        None => (s, 1),
    };
    if qty == 0 {
        return Err(format!("quantity must be non-zero in '{}'", s));
    }
    Ok(Demand {
        rect: parse_dimensions(dims)?,
        qty,
    })
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let demands: Vec<Demand> = cli
        .pieces
        .iter()
        .map(|p| parse_piece(p))
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });

    let solution = SheetSpec::new(cli.board, cli.kerf)
        .and_then(|spec| Solver::new(spec, expand_demands(&demands)))
        .map(|solver| solver.solve())
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });

    for i in solution.overflowing_sheets() {
        eprintln!(
            "Warning: sheet {} holds a piece larger than the board {}",
            i + 1,
            cli.board
        );
    }

    if cli.json {
        match serde_json::to_string_pretty(&solution) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    for (i, sheet) in solution.sheets.iter().enumerate() {
        println!("Sheet {} ({}) - {:.1}%:", i + 1, sheet.kind, sheet.efficiency);
        for p in &sheet.placements {
            let rot = if p.rotated { " [rotated]" } else { "" };
            println!("  {} @ ({}, {}){}", p.true_size(), p.x, p.y, rot);
        }
        for free in &sheet.free_rects {
            println!("  free band: {}x{} @ ({}, {})", free.w, free.h, free.x, free.y);
        }
        println!();
    }

    println!(
        "Summary: {} piece{} on {} sheet{}, {:.1}% overall efficiency",
        solution.piece_count(),
        if solution.piece_count() == 1 { "" } else { "s" },
        solution.sheet_count(),
        if solution.sheet_count() == 1 { "" } else { "s" },
        solution.overall_efficiency(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_board_presets() {
        assert_eq!(parse_board("standard"), Ok(Rect::new(2800, 2070)));
        assert_eq!(parse_board("large"), Ok(Rect::new(3050, 1830)));
        assert_eq!(parse_board("2440x1220"), Ok(Rect::new(2440, 1220)));
        assert!(parse_board("0x1220").is_err());
        assert!(parse_board("huge").is_err());
    }

    #[test]
    fn test_parse_piece() {
        assert_eq!(
            parse_piece("1200x800:5"),
            Ok(Demand { rect: Rect::new(1200, 800), qty: 5 })
        );
        assert_eq!(
            parse_piece("504x769"),
            Ok(Demand { rect: Rect::new(504, 769), qty: 1 })
        );
        assert!(parse_piece("504x769:0").is_err());
        assert!(parse_piece("504x769x2").is_err());
        assert!(parse_piece("axb").is_err());
    }
}
