use mufiz_db::{Diagnostic, File, RootDatabase, check_file};

#[derive(Debug, PartialEq, Eq)]
struct ExpectedDiag {
    line: usize,
    message: String,
}

#[derive(Debug, PartialEq, Eq)]
struct ActualDiag {
    line: usize,
    message: String,
}

fn parse_expectations(fixture: &str) -> Vec<ExpectedDiag> {
    let mut expected = Vec::new();

    for (idx, line) in fixture.lines().enumerate() {
        for comment in line.split("//~").skip(1) {
            let comment = comment.trim();
            let comment = comment.strip_prefix("ERROR").unwrap_or(comment).trim();
            if comment.is_empty() {
                continue;
            }
            expected.push(ExpectedDiag { line: idx + 1, message: comment.to_owned() });
        }
    }

    expected
}

fn collect_actual(db: &RootDatabase, file: File, diagnostics: &[Diagnostic]) -> Vec<ActualDiag> {
    let mut actual = diagnostics
        .iter()
        .map(|diag| {
            let line = file.line_col(db, diag.range()).line as usize + 1;
            ActualDiag { line, message: diag.message().to_owned() }
        })
        .collect::<Vec<_>>();
    actual.sort_by_key(|diag| (diag.line, diag.message.clone()));
    actual
}

#[track_caller]
fn check(fixture: &str) {
    let db = RootDatabase::default();
    let file = File::new(&db, "check.mufiz".into(), fixture.to_owned());

    let diagnostics = check_file(&db, file);
    let mut actual = collect_actual(&db, file, diagnostics);
    let mut expected = parse_expectations(fixture);

    expected.sort_by_key(|diag| (diag.line, diag.message.clone()));

    assert_eq!(
        expected.len(),
        actual.len(),
        "expected {} diagnostic(s), got {}\nexpected: {expected:#?}\nactual: {actual:#?}",
        expected.len(),
        actual.len(),
    );

    for expected_diag in expected {
        let Some(pos) = actual.iter().position(|diag| {
            diag.line == expected_diag.line && diag.message.contains(&expected_diag.message)
        }) else {
            panic!(
                "missing diagnostic on line {} containing `{}`\nactual: {actual:#?}",
                expected_diag.line, expected_diag.message
            );
        };
        actual.remove(pos);
    }

    assert!(actual.is_empty(), "unexpected diagnostics:\n{actual:#?}");
}

#[test]
fn well_formed_program() {
    check(
        r#"
class Greeter < Base {
    init(name) { self.name = name; }
    greet() { print "hello, " + self.name; }
}

fun main() {
    var g = Greeter("mufiz");
    for (var i = 0; i < 3; i = i + 1) g.greet();
    foreach (x in list {1, 2, 3+4i}) print x;
    var t = table { "k": {1, 2}, };
    t["k"][0] = nil;
}
"#,
    );
}

#[test]
fn missing_semicolon() {
    check(
        r#"
var a = 1 //~ ERROR expected ';'
var b = 2;
"#,
    );
}

#[test]
fn missing_expression() {
    check(
        r#"
print 1;
print ; //~ ERROR expected expression
print 3;
"#,
    );
}

#[test]
fn invalid_assignment_target() {
    check(
        r#"
fun f() {
    1 = 2; //~ ERROR invalid assignment target
    a.b[0] = 2;
}
"#,
    );
}

#[test]
fn one_error_per_statement() {
    check(
        r#"
print (1 + ] ) ; //~ ERROR expected expression
print 2;
"#,
    );
}

#[test]
fn errors_in_separate_statements() {
    check(
        r#"
fun f() {
    var = 1; //~ ERROR expected identifier
    print 2 3; //~ ERROR expected ';'
}
"#,
    );
}

#[test]
fn unterminated_string() {
    check(
        r#"
print "never closed //~ ERROR unterminated string literal //~ ERROR expected ';'
print 1;
"#,
    );
}

#[test]
fn invalid_escape() {
    check(
        r#"
print "tab\q"; //~ ERROR invalid escape sequence
"#,
    );
}

#[test]
fn unknown_character_is_reported_once() {
    check(
        r#"
var x = 1 # 2; //~ ERROR unrecognized character
print x;
"#,
    );
}

#[test]
fn unclosed_block() {
    check(
        r#"
fun f() {
    print 1; //~ ERROR expected '}'
"#,
    );
}

#[test]
fn stray_closing_brace() {
    check(
        r#"
} //~ ERROR unexpected '}'
print 1;
"#,
    );
}

#[test]
fn malformed_parameter_list() {
    check(
        r#"
fun f(a, 1) { return a; } //~ ERROR expected identifier
"#,
    );
}

#[test]
fn error_after_nested_block_is_reported() {
    check(
        r#"
if (x) {
    print ; //~ ERROR expected expression
} else ) print 3; //~ ERROR expected statement
print 4;
"#,
    );
}

#[test]
fn missing_separator_in_vector() {
    check(
        r#"
var v = {1 2, 3}; //~ ERROR expected ','
"#,
    );
}

#[test]
fn deep_nesting_is_reported() {
    let depth = 10_000;
    let fixture = format!(
        "\nprint {}1{}; //~ ERROR nesting too deep\nprint 2;\n",
        "(".repeat(depth),
        ")".repeat(depth)
    );
    check(&fixture);
}

#[test]
fn unexpected_comma_in_vector() {
    check(
        r#"
var v = {1,, 2}; //~ ERROR unexpected ','
"#,
    );
}
