//! ASCII startup banner with a warm gradient (ROOMLENS).

use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::ExecutableCommand;
use figlet_rs::FIGfont;
use std::io::{stdout, Write};

/// Terracotta (#e2725b).
const TERRACOTTA: (u8, u8, u8) = (0xe2, 0x72, 0x5b);
/// Warm gold (#ffc87c).
const WARM_GOLD: (u8, u8, u8) = (0xff, 0xc8, 0x7c);

/// Linear interpolation between two RGB colors. `t` in [0.0, 1.0].
fn lerp_rgb(a: (u8, u8, u8), b: (u8, u8, u8), t: f64) -> (u8, u8, u8) {
    let r = (f64::from(a.0) * (1.0 - t) + f64::from(b.0) * t).round() as u8;
    let g = (f64::from(a.1) * (1.0 - t) + f64::from(b.1) * t).round() as u8;
    let bl = (f64::from(a.2) * (1.0 - t) + f64::from(b.2) * t).round() as u8;
    (r, g, bl)
}

/// Prints the welcome banner: "ROOMLENS" in figlet ASCII with a gradient
/// from terracotta to warm gold, then the version line.
pub fn print_welcome() {
    let mut out = stdout();
    let font = FIGfont::standard().expect("figlet standard font");
    let figure = font.convert("ROOMLENS").expect("figlet convert ROOMLENS");
    let art = figure.to_string();
    let lines: Vec<&str> = art.lines().collect();
    let total = lines.len().max(1);

    for (i, line) in lines.iter().enumerate() {
        let t = if total <= 1 {
            1.0
        } else {
            i as f64 / (total - 1) as f64
        };
        let (r, g, b) = lerp_rgb(TERRACOTTA, WARM_GOLD, t);
        let _ = out.execute(SetForegroundColor(Color::Rgb { r, g, b }));
        let _ = out.execute(Print(line));
        let _ = out.execute(Print("\r\n"));
        let _ = out.execute(ResetColor);
    }

    let version = env!("CARGO_PKG_VERSION");
    let _ = out.execute(SetForegroundColor(Color::Rgb {
        r: WARM_GOLD.0,
        g: WARM_GOLD.1,
        b: WARM_GOLD.2,
    }));
    let _ = out.execute(Print(format!("v{version}\r\n")));
    let _ = out.execute(Print("Room critique in your terminal\r\n"));
    let _ = out.execute(ResetColor);
    let _ = out.flush();
}
