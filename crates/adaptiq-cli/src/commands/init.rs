//! The `adaptiq init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("adaptiq.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("question-banks")?;
    write_if_missing(Path::new("question-banks/example.toml"), EXAMPLE_BANK)?;

    println!("\nNext steps:");
    println!("  1. Edit adaptiq.toml with your display name");
    println!("  2. Run: adaptiq validate --bank question-banks/example.toml");
    println!("  3. Run: adaptiq run");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# adaptiq configuration

question_count = 15
display_name = "Anonymous"
# display_name = "${USER}"
output_dir = "./adaptiq-results"
question_bank = "question-banks/example.toml"
"#;

const EXAMPLE_BANK: &str = r#"[bank]
id = "example"
name = "Example Question Bank"
description = "A small bank to get started"

[[questions]]
id = "e1"
text = "What is 7 + 5?"
difficulty = "easy"
topic = "Arithmetic"
correct = "B"
[questions.options]
A = "11"
B = "12"
C = "13"
D = "14"

[[questions]]
id = "e2"
text = "Which word means the opposite of 'ancient'?"
difficulty = "easy"
topic = "Vocabulary"
correct = "C"
[questions.options]
A = "Old"
B = "Antique"
C = "Modern"
D = "Historic"

[[questions]]
id = "m1"
text = "What is 15% of 240?"
difficulty = "medium"
topic = "Arithmetic"
correct = "A"
[questions.options]
A = "36"
B = "32"
C = "40"
D = "24"

[[questions]]
id = "m2"
text = "Book is to reading as fork is to:"
difficulty = "medium"
topic = "Vocabulary"
correct = "D"
[questions.options]
A = "Drawing"
B = "Writing"
C = "Stirring"
D = "Eating"

[[questions]]
id = "h1"
text = "A train travels 300 km in 2.5 hours. What is its average speed?"
difficulty = "hard"
topic = "Arithmetic"
correct = "C"
[questions.options]
A = "100 km/h"
B = "110 km/h"
C = "120 km/h"
D = "125 km/h"

[[questions]]
id = "h2"
text = "Which word is closest in meaning to 'ephemeral'?"
difficulty = "hard"
topic = "Vocabulary"
correct = "A"
[questions.options]
A = "Short-lived"
B = "Eternal"
C = "Ethereal"
D = "Essential"
"#;
