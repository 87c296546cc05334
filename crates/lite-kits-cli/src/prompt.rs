use std::io::{BufRead, Write};

/// Ask a yes/no question on stdout. Anything but `y`/`yes` is a no,
/// including end of input.
pub fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{question} [y/N]: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    let n = std::io::stdin().lock().read_line(&mut line)?;
    if n == 0 {
        println!();
        return Ok(false);
    }
    Ok(is_yes(&line))
}

fn is_yes(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}
