use std::process;

fn main() {
    match seqsub_cli::run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("seqsub error: {err}");
            process::exit(1);
        }
    }
}
