//! Integration tests for end-to-end compilation.
//!
//! These run the whole pipeline, from source text through type checking and
//! LLVM IR generation, and execute the result in the JIT.

use std::env;

use inkwell::{context::Context, OptimizationLevel};
use rutaceae::{
    check_source, compile_source,
    compiler::{
        backend::{run_jit_main, write_object_file},
        compiler::CompilerConfig,
    },
};

fn run(source: &str) -> i32 {
    run_with(source, CompilerConfig::default())
}

fn run_with(source: &str, config: CompilerConfig) -> i32 {
    let context = Context::create();
    let compiler = match compile_source(source, "test.ru", &context, &config) {
        Ok(compiler) => compiler,
        Err(errors) => panic!("compilation failed: {:?}", errors),
    };

    run_jit_main(&compiler.module).unwrap()
}

#[test]
fn test_square_of_five() {
    let source = "
        fn int square(int x) { return x * x; }
        fn int main() { return square(5); }
    ";

    assert_eq!(run(source), 25);
}

#[test]
fn test_synthesized_main_returns_zero() {
    assert_eq!(run("let x = 1; x += 2; print(x);"), 0);
}

#[test]
fn test_globals_are_initialized_before_user_main() {
    let source = "
        let base = 40;
        let offset: int;
        offset = 2;
        fn int main() { return base + offset; }
    ";

    assert_eq!(run(source), 42);
}

#[test]
fn test_and_skips_right_operand_when_left_is_false() {
    let source = "
        let calls = 0;
        fn bool touch(bool result) { calls += 1; return result; }
        fn int main() {
            let a = touch(false) && touch(true);
            let b = touch(true) && touch(false);
            return calls;
        }
    ";

    assert_eq!(run(source), 3);
}

#[test]
fn test_or_skips_right_operand_when_left_is_true() {
    let source = "
        let calls = 0;
        fn bool touch(bool result) { calls += 1; return result; }
        fn int main() {
            let a = touch(true) || touch(false);
            let b = touch(false) || touch(true);
            return calls;
        }
    ";

    assert_eq!(run(source), 3);
}

#[test]
fn test_recursion_terminates_through_short_circuit() {
    let source = "
        let steps = 0;
        fn bool countdown(int n) { steps++; return n == 0 || countdown(n - 1); }
        fn int main() { countdown(10); return steps; }
    ";

    assert_eq!(run(source), 11);
}

#[test]
fn test_float_promotion_at_runtime() {
    let source = "
        let hits = 0;
        fn bool hit() { hits += 1; return true; }
        fn float half(int x) { return x / 2.0; }
        fn int main() {
            let h: float = half(9);
            let whole: float = 7;
            let r = h == 4.5 && hit();
            let s = whole + 1 == 8.0 && hit();
            return hits;
        }
    ";

    assert_eq!(run(source), 2);
}

#[test]
fn test_shadowing_restores_outer_binding() {
    let source = "
        fn int main() {
            let x = 1;
            { let x = 100; x += 1; }
            return x;
        }
    ";

    assert_eq!(run(source), 1);
}

#[test]
fn test_integer_arithmetic() {
    assert_eq!(run("fn int main() { return 7 / 2 * 10 + 17 % 5 - -3; }"), 35);
}

#[test]
fn test_string_comparison_at_runtime() {
    let source = "
        let score = 0;
        fn bool point() { score += 1; return true; }
        fn int main() {
            let a = \"apple\";
            let x = a == \"apple\" && point();
            let y = a != \"pear\" && point();
            let z = a < \"banana\" && point();
            let w = a > \"banana\" && point();
            return score;
        }
    ";
    assert_eq!(run(source), 3);
}

#[test]
fn test_unassigned_string_is_empty() {
    let source = "
        let hits = 0;
        let s: string;
        fn bool hit() { hits += 1; return true; }
        fn int main() {
            let t: string;
            print(s, t);
            let a = s == \"\" && hit();
            let b = t < \"a\" && hit();
            let c = s != \"a\" && hit();
            return hits;
        }
    ";

    assert_eq!(run(source), 3);
}

#[test]
fn test_void_main_returns_zero() {
    assert_eq!(run("fn void main() { print(\"hello\"); }"), 0);
}

#[test]
fn test_optimized_program_gives_same_result() {
    let source = "
        fn int add(int a, int b) { let sum = a + b; return sum; }
        fn int main() { return add(20, 22); }
    ";
    let config = CompilerConfig {
        optimization: OptimizationLevel::Aggressive,
        ..CompilerConfig::default()
    };

    assert_eq!(run_with(source, config), 42);
}

#[test]
fn test_semantic_errors_stop_before_code_generation() {
    let context = Context::create();
    let result = compile_source(
        "let x: int = \"s\"; print(y);",
        "test.ru",
        &context,
        &CompilerConfig::default(),
    );

    let errors = match result {
        Ok(_) => panic!("expected errors"),
        Err(errors) => errors,
    };
    let names: Vec<&str> = errors.iter().map(|error| error.get_error_name()).collect();
    assert_eq!(names, vec!["TypeMismatchError", "UndefinedNameError"]);
}

#[test]
fn test_check_reports_missing_return() {
    let errors = check_source("fn int f() { print(1); }", "test.ru").unwrap_err();
    assert_eq!(errors[0].get_error_name(), "MissingReturnError");

    assert!(check_source("fn void g() { print(1); }", "test.ru").is_ok());
}

#[test]
fn test_write_object_file() {
    let context = Context::create();
    let compiler = compile_source(
        "fn int main() { return 0; }",
        "test.ru",
        &context,
        &CompilerConfig::default(),
    )
    .unwrap_or_else(|errors| panic!("{:?}", errors));

    let path = env::temp_dir().join(format!("rutaceae_test_{}.o", std::process::id()));
    write_object_file(&compiler.module, &path, OptimizationLevel::None).unwrap();

    assert!(path.exists());
    std::fs::remove_file(path).unwrap();
}
