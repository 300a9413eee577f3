use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
    process::{exit, Command},
    time::Instant,
};

use clap::{Parser, Subcommand};
use inkwell::{context::Context, OptimizationLevel};
use log::info;
use rutaceae::{
    check_source,
    compile_source,
    compiler::{
        backend::{run_jit_main, write_ir_file, write_object_file},
        compiler::{Compiler, CompilerConfig},
    },
    display_error,
    errors::errors::Error,
};

#[derive(Parser)]
#[command(name = "rutaceae")]
#[command(about = "Compiler for the Rutaceae language")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Type check a source file without generating code
    Check {
        /// Input source file
        input: PathBuf,
    },

    /// Print or save the generated LLVM IR
    Ir {
        /// Input source file
        input: PathBuf,

        /// Write the IR to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Optimization level (0-3)
        #[arg(short = 'O', default_value_t = 0)]
        opt_level: u8,
    },

    /// Compile to a native executable, linking with the system `cc`
    Build {
        /// Input source file
        input: PathBuf,

        /// Output executable
        #[arg(short, long, default_value = "a.out")]
        output: PathBuf,

        /// Optimization level (0-3)
        #[arg(short = 'O', default_value_t = 0)]
        opt_level: u8,
    },

    /// Compile and run `main` in the JIT
    Run {
        /// Input source file
        input: PathBuf,

        /// Optimization level (0-3)
        #[arg(short = 'O', default_value_t = 0)]
        opt_level: u8,
    },
}

fn optimization_level(level: u8) -> OptimizationLevel {
    match level {
        0 => OptimizationLevel::None,
        1 => OptimizationLevel::Less,
        2 => OptimizationLevel::Default,
        _ => OptimizationLevel::Aggressive,
    }
}

fn module_name(input: &Path) -> String {
    input
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| String::from("main"))
}

/// A source file and its contents, kept together for error rendering.
struct SourceFile {
    path: PathBuf,
    name: String,
    contents: String,
}

impl SourceFile {
    fn read(path: &Path) -> SourceFile {
        let contents = match read_to_string(path) {
            Ok(contents) => contents,
            Err(error) => {
                eprintln!("Error: could not read {}: {}", path.display(), error);
                exit(1);
            }
        };

        SourceFile {
            path: path.to_path_buf(),
            name: path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default(),
            contents,
        }
    }

    fn report(&self, errors: &[Error]) -> ! {
        for error in errors {
            display_error(error, &self.path.to_string_lossy(), &self.contents);
        }
        eprintln!("{} error(s) found", errors.len());
        exit(1);
    }

    fn compile<'ctx>(&self, context: &'ctx Context, opt_level: u8) -> Compiler<'ctx> {
        let config = CompilerConfig {
            module_name: module_name(&self.path),
            optimization: optimization_level(opt_level),
            verify: true,
        };

        let start = Instant::now();
        let compiler = compile_source(&self.contents, &self.name, context, &config)
            .unwrap_or_else(|errors| self.report(&errors));
        info!("generated IR in {:?}", start.elapsed());

        compiler
    }
}

fn link(object: &Path, output: &Path) -> Result<(), String> {
    let result = Command::new("cc")
        .arg(object)
        .arg("-o")
        .arg(output)
        .output()
        .map_err(|error| format!("failed to run cc: {}", error))?;

    if !result.status.success() {
        return Err(format!(
            "linking failed:\n{}",
            String::from_utf8_lossy(&result.stderr)
        ));
    }

    Ok(())
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let context = Context::create();

    match cli.command {
        Commands::Check { input } => {
            let source = SourceFile::read(&input);
            if let Err(errors) = check_source(&source.contents, &source.name) {
                source.report(&errors);
            }
            println!("{}: no errors", input.display());
        }
        Commands::Ir {
            input,
            output,
            opt_level,
        } => {
            let source = SourceFile::read(&input);
            let compiler = source.compile(&context, opt_level);

            match output {
                Some(path) => {
                    if let Err(error) = write_ir_file(&compiler.module, &path) {
                        source.report(&[error]);
                    }
                }
                None => print!("{}", compiler.print_ir()),
            }
        }
        Commands::Build {
            input,
            output,
            opt_level,
        } => {
            let source = SourceFile::read(&input);
            let compiler = source.compile(&context, opt_level);

            let object = output.with_extension("o");
            if let Err(error) =
                write_object_file(&compiler.module, &object, optimization_level(opt_level))
            {
                source.report(&[error]);
            }

            if let Err(message) = link(&object, &output) {
                eprintln!("Error: {}", message);
                exit(1);
            }
            info!("linked {}", output.display());
        }
        Commands::Run { input, opt_level } => {
            let source = SourceFile::read(&input);
            let compiler = source.compile(&context, opt_level);

            match run_jit_main(&compiler.module) {
                Ok(result) => println!("Program result: {}", result),
                Err(error) => source.report(&[error]),
            }
        }
    }
}
