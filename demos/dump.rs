// To run this example:
//
//   $ cargo run --example dump demos/data/great.csv
//
// With no argument, CSV data is read from stdin.
use std::env;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader, Read};

use csvline::Parser;

fn example() -> Result<(), Box<dyn Error>> {
    let rdr: Box<dyn Read> = match env::args_os().nth(1) {
        Some(file_path) => Box::new(File::open(file_path)?),
        None => Box::new(io::stdin()),
    };
    let mut rdr = BufReader::new(rdr);
    let mut parser = Parser::new();
    loop {
        let line = match parser.read_line(&mut rdr) {
            Ok(line) => line,
            Err(ref err) if err.is_end_of_stream() => break,
            Err(err) => {
                return Err(From::from(format!("Error reading line: {}", err)))
            }
        };
        println!("Line: {}", line);

        let num_fields = parser.field_count();
        println!("Number of Fields: {}", num_fields);
        for i in 0..num_fields {
            println!("Field {}: {}", i + 1, parser.get_field(i)?);
        }
    }
    Ok(())
}

// A failed read ends the loop, not the process: the error is printed and the
// exit status stays 0.
fn main() {
    if let Err(err) = example() {
        println!("{}", err);
    }
}
