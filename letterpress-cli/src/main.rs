//! Prints its arguments, or each line of standard input, in large letters.

use std::env;
use std::io::{self, BufRead as _};
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};
use clap::Parser;
use letterpress::color::{Color, ColorConfig};
use letterpress::font::Font;
use letterpress::print::{Alignment, Printer};
use letterpress::render::Settings;
use letterpress::source::{FontSource, default_loader};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let base = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    let loader = default_loader(cli.font_dir.as_deref(), base.as_deref());
    let colors = cli.colors()?;

    if cli.list {
        return list_fonts(&*loader, colors);
    }
    if cli.version {
        println!("letterpress {}", env!("CARGO_PKG_VERSION"));
        println!("Fonts: {}", loader.origin());
        return Ok(());
    }

    let font = loader
        .font_by_name(&cli.font)
        .with_context(|| format!("couldn't find font {} in {}", cli.font, loader.origin()))?;
    if let Some(code) = cli.info_code {
        let info = match code {
            2 => loader.origin(),
            3 => cli.font.clone(),
            4 => cli.width.to_string(),
            5 => "flf2".to_owned(),
            _ => bail!("invalid info code {code}, expecting 2 to 5"),
        };
        println!("{info}");
        return Ok(());
    }

    let printer = Printer::new(cli.width)
        .alignment(cli.alignment())
        .colors(colors);
    let settings = cli.settings(&font);
    if cli.message.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line.context("failed to read standard input")?;
            printer.print_message(&format!("{line}\n"), &font, settings)?;
        }
    } else {
        printer.print_message(&cli.message.join(" "), &font, settings)?;
    }
    Ok(())
}

#[derive(Parser)]
#[command(about, disable_version_flag = true)]
struct Cli {
    /// The text to print; read line by line from standard input if missing
    message: Vec<String>,
    /// Name of the font to use
    #[arg(short = 'f', default_value = "pixel")]
    font: String,
    /// Directory to look for fonts in before the bundled ones
    #[arg(short = 'd', env = "LETTERPRESS_FONT_DIR")]
    font_dir: Option<PathBuf>,
    /// Output width
    #[arg(short = 'w', default_value_t = 80)]
    width: usize,
    /// Center the output
    #[arg(short = 'c')]
    center: bool,
    /// Align the output to the right
    #[arg(short = 'r')]
    right: bool,
    /// Print right-to-left
    #[arg(short = 'R')]
    right_to_left: bool,
    /// Print information instead: 2 for the font origin, 3 for the font name, 4 for the output
    /// width, 5 for the supported font formats
    #[arg(short = 'I')]
    info_code: Option<i64>,
    /// List the available fonts, each with a sample
    #[arg(long)]
    list: bool,
    /// Print the version and font origin
    #[arg(short = 'v', long)]
    version: bool,
    /// Start color of a gradient: hex, rgb(r, g, b) or a name
    #[arg(long)]
    gradient_start: Option<Color>,
    /// End color of a gradient
    #[arg(long)]
    gradient_end: Option<Color>,
    /// Rainbow colors
    #[arg(long, visible_alias = "gay")]
    rainbow: bool,
}

impl Cli {
    fn colors(&self) -> Result<ColorConfig> {
        if self.rainbow {
            return Ok(ColorConfig::Rainbow);
        }
        match (self.gradient_start, self.gradient_end) {
            (Some(start), Some(end)) => Ok(ColorConfig::Gradient { start, end }),
            (None, None) => Ok(ColorConfig::None),
            _ => bail!("both --gradient-start and --gradient-end must be given for a gradient"),
        }
    }

    const fn alignment(&self) -> Alignment {
        if self.right {
            Alignment::Right
        } else if self.center {
            Alignment::Center
        } else {
            Alignment::Left
        }
    }

    fn settings(&self, font: &Font) -> Settings {
        let mut settings = font.settings();
        if self.right_to_left {
            settings.set_right_to_left(true);
        }
        settings
    }
}

fn list_fonts(loader: &dyn FontSource, colors: ColorConfig) -> Result<()> {
    println!("Fonts in {}:", loader.origin());
    let printer = Printer::new(80).colors(colors);
    for name in loader.font_names()? {
        println!("{name}:");
        match loader.font_by_name(&name) {
            Ok(font) => printer.print_message(&name, &font, font.settings())?,
            Err(error) => log::warn!("skipping {name}: {error}"),
        }
        println!();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory as _, Parser as _};
    use letterpress::color::{Color, ColorConfig};
    use letterpress::print::Alignment;

    use super::Cli;

    #[test]
    fn command() {
        Cli::command().debug_assert();
    }

    #[test]
    fn colors() {
        let cli = Cli::parse_from([
            "letterpress",
            "--gradient-start",
            "red",
            "--gradient-end",
            "#0000FF",
            "hi",
        ]);
        assert_eq!(
            cli.colors().unwrap(),
            ColorConfig::Gradient {
                start: Color::new(255, 0, 0),
                end: Color::new(0, 0, 255)
            }
        );
        let cli = Cli::parse_from(["letterpress", "--gay"]);
        assert_eq!(cli.colors().unwrap(), ColorConfig::Rainbow);
        let cli = Cli::parse_from(["letterpress", "--gradient-start", "red"]);
        assert!(cli.colors().is_err());
        assert!(Cli::try_parse_from(["letterpress", "--gradient-start", "rgb(300,0,0)"]).is_err());
    }

    #[test]
    fn flags() {
        let cli = Cli::parse_from([
            "letterpress", "-c", "-r", "-w", "40", "-I", "3", "hello", "world",
        ]);
        assert_eq!(cli.alignment(), Alignment::Right);
        assert_eq!(cli.width, 40);
        assert_eq!(cli.info_code, Some(3));
        assert_eq!(cli.message, ["hello", "world"]);
        assert_eq!(cli.font, "pixel");
    }
}
