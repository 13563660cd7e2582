//! Console output: startup banner and one line per streamed fix.

use lode::Position;

/// Startup banner listing what is about to be served.
pub fn banner(port: u16, source: &str, params: &[String], wait_for_keypress: bool) -> String {
    let params = if params.is_empty() {
        "(none)".to_string()
    } else {
        params.join(" ")
    };
    format!(
        concat!(
            "Lode NMEA server v{}\n",
            "  Port:              {}\n",
            "  Source:            {}\n",
            "  Parameters:        {}\n",
            "  Wait for keypress: {}",
        ),
        lode::VERSION,
        port,
        source,
        params,
        if wait_for_keypress { "yes" } else { "no" },
    )
}

/// One console line for a fix.
pub fn format_fix(position: &Position) -> String {
    let mut line = format!(
        "#{:<5} lat {:>11.6}  lon {:>11.6}  speed {:>6.1} km/h  ele {:>7.1} m  {}",
        position.index,
        position.lat,
        position.lon,
        position.speed,
        position.elevation,
        position.time.format("%Y-%m-%d %H:%M:%S%.3f UTC"),
    );
    if !position.description.is_empty() {
        line.push_str("  ");
        line.push_str(&position.description);
    }
    line
}

/// Fix observer used by the pacing loop.
pub fn print_fix(position: &Position) {
    println!("{}", format_fix(position));
}
