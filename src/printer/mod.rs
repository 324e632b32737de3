//! Plain-terminal printers for one-shot mode (owo-colors).

use owo_colors::OwoColorize;

pub struct TextPrinter {
    pub color: Option<&'static str>,
}

impl TextPrinter {
    pub fn print(&self, text: &str) {
        if let Some(c) = self.color {
            match c {
                "green" => println!("{}", text.green()),
                "cyan" => println!("{}", text.cyan()),
                "red" => println!("{}", text.red()),
                "yellow" => println!("{}", text.yellow()),
                _ => println!("{}", text),
            }
        } else {
            println!("{}", text);
        }
    }
}

/// Prints a bold section heading followed by its body.
pub struct SectionPrinter {
    pub colored: bool,
}

impl SectionPrinter {
    pub fn heading(&self, title: &str) {
        if self.colored {
            println!("{}", title.bold().underline());
        } else {
            println!("{}", title);
        }
    }

    pub fn section(&self, title: &str, body: &str, color: Option<&'static str>) {
        self.heading(title);
        let printer = TextPrinter {
            color: if self.colored { color } else { None },
        };
        printer.print(body.trim_end_matches('\n'));
        println!();
    }
}
