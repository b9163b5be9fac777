use std::{convert::Infallible, env, error::Error, fs, io};
use svelte_fmt::{config::FormatOptions, format_text};

fn main() -> Result<(), Box<dyn Error>> {
    let file_path = env::args().nth(1).ok_or("missing file path")?;
    let code = fs::read_to_string(file_path)?;
    let options = match fs::read_to_string("svelte_fmt.toml") {
        Ok(s) => toml::from_str(&s)?,
        Err(error) => {
            if error.kind() == io::ErrorKind::NotFound {
                FormatOptions::default()
            } else {
                return Err(Box::new(error));
            }
        }
    };

    let formatted = format_text(&code, &options, |code, _| Ok::<_, Infallible>(code.into()))?;
    print!("{formatted}");
    Ok(())
}
