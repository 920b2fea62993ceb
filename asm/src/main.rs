use fass::{ast::Program, Error};
use std::process::ExitCode;
use tracing::Level;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Parse tree (YAML)
    #[clap(default_value = "main.fass.yaml")]
    input: String,

    /// Output file
    #[clap(short, long, default_value = "main.fass.bin")]
    output: String,

    /// Write only the program instead of the full 64K image
    #[clap(long)]
    trim: bool,

    /// Write the symbol map (YAML)
    #[clap(short, long)]
    symbols: Option<String>,

    /// Dump assembly listing
    #[clap(short, long)]
    dump: bool,

    /// One of `TRACE`, `DEBUG`, `INFO`, `WARN`, or `ERROR`
    #[clap(short, long, default_value_t = Level::INFO)]
    log_level: Level,
}

fn main() -> ExitCode {
    use clap::Parser;

    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .init();
    println!("fass 6502 Assembler");

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            err.print_diag(&args.input);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Error> {
    println!("1. Read Parse Tree");
    println!("  < {}", args.input);
    let file =
        std::fs::File::open(&args.input).map_err(|e| Error::FileOpen(args.input.clone(), e))?;
    let program: Program = serde_yaml::from_reader(std::io::BufReader::new(file))
        .map_err(|e| Error::Tree(args.input.clone(), e))?;

    println!("2. Resolve Labels & Generate Binary");
    let out = fass::assemble(&program)?;
    println!(
        "  {} statements, {} symbols, program ${:04X}..${:04X}",
        program.stmts.len(),
        out.symbols.len(),
        out.start,
        out.end
    );

    println!("3. Write Output");
    println!("  > {}", args.output);
    let bin = if args.trim { out.program() } else { &out.image[..] };
    std::fs::write(&args.output, bin).map_err(|e| Error::FileWrite(args.output.clone(), e))?;

    if let Some(path) = &args.symbols {
        println!("  > {}", path);
        let map = serde_yaml::to_string(&out.symbols)
            .map_err(|e| Error::Internal(format!("cannot serialize symbols: {}", e)))?;
        std::fs::write(path, map).map_err(|e| Error::FileWrite(path.clone(), e))?;
    }

    if args.dump {
        fass::listing::print_dump(&program, &out);
    }
    Ok(())
}
