use anyhow::Result;
use serde_json::Value;

use crate::CliTest;

const PLAYER: &str = r#"
/**
 * The player.
 * @param {Object} options Player options
 */
var Player = Component.extend({
  /** Start playback. */
  play: function() {},

  /** Stop playback. */
  stop: function() {}
});

/** Current volume. */
Player.prototype.volume = 1;

/** Create a player. */
Player.create = function(options) {};
"#;

fn parse_stdout(output: &std::process::Output) -> Result<Value> {
    Ok(serde_json::from_slice(&output.stdout)?)
}

fn ids(table: &Value) -> Vec<String> {
    table
        .as_object()
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default()
}

#[test]
fn test_extract_default_includes() -> Result<()> {
    let test = CliTest::with_file("src/player.js", PLAYER)?;

    let output = test.extract_command().output()?;
    assert!(output.status.success());

    let table = parse_stdout(&output)?;
    insta::assert_snapshot!(ids(&table).join("\n"), @r"
    Player
    Player#play
    Player#stop
    Player#volume
    Player.create
    ");

    let player = &table["Player"];
    assert_eq!(player["kind"], "class");
    assert_eq!(player["inheritsFrom"], "Component");
    assert_eq!(player["summary"], "The player.");
    assert_eq!(player["params"][0]["name"], "options");
    assert_eq!(player["source"]["name"], "src/player.js");
    assert_eq!(player["source"]["line"], 6);

    let play = &table["Player#play"];
    assert_eq!(play["kind"], "function");
    assert_eq!(play["container"], "Player");
    assert_eq!(play["isInstanceMember"], true);

    assert_eq!(table["Player.create"]["params"][0]["name"], "options");
    assert!(table["Player.create"].get("isInstanceMember").is_none());

    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("Extracted 5 entities from 1 source file"));

    Ok(())
}

#[test]
fn test_extract_compact_output() -> Result<()> {
    let test = CliTest::with_file("src/a.js", "/** The answer. */\nvar answer = 42;\n")?;

    let output = test.extract_command().arg("--compact").output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    insta::assert_snapshot!(stdout.trim(), @r#"{"answer":{"id":"answer","kind":"member","name":"answer","description":"The answer.","summary":"The answer.","source":{"line":2,"name":"src/a.js"}}}"#);

    Ok(())
}

#[test]
fn test_extract_base_url() -> Result<()> {
    let test = CliTest::with_file("src/a.js", "/** comment */\nvar a;\n")?;

    let output = test
        .extract_command()
        .args(["--base-url", "https://example.com/blob/main/"])
        .output()?;
    assert!(output.status.success());

    let table = parse_stdout(&output)?;
    assert_eq!(
        table["a"]["source"]["url"],
        "https://example.com/blob/main/src/a.js"
    );

    Ok(())
}

#[test]
fn test_extract_honours_ignores() -> Result<()> {
    let test = CliTest::with_file("src/a.js", "/** comment */\nvar a;\n")?;
    test.write_file("src/a.min.js", "/** comment */\nvar minified;\n")?;
    test.write_file("src/node_modules/dep/index.js", "/** comment */\nvar dep;\n")?;
    test.write_file("src/generated/out.js", "/** comment */\nvar generated;\n")?;
    test.write_file(
        ".docliftrc.json",
        r#"{ "ignores": ["**/node_modules/**", "**/*.min.js", "src/generated"] }"#,
    )?;

    let output = test.extract_command().output()?;
    assert!(output.status.success());

    let table = parse_stdout(&output)?;
    assert_eq!(ids(&table), vec!["a"]);

    Ok(())
}

#[test]
fn test_extract_explicit_paths() -> Result<()> {
    let test = CliTest::with_file("src/a.js", "/** comment */\nvar a;\n")?;
    test.write_file("lib/b.js", "/** comment */\nvar b;\n")?;

    let output = test.extract_command().arg("lib").output()?;
    assert!(output.status.success());

    let table = parse_stdout(&output)?;
    assert_eq!(ids(&table), vec!["b"]);

    Ok(())
}

#[test]
fn test_extract_explicit_paths_keep_order() -> Result<()> {
    let test = CliTest::with_file("b.js", "/** from b */\nvar shared;\n")?;
    test.write_file("a.js", "/** from a */\nvar shared;\n")?;

    let output = test.extract_command().args(["b.js", "a.js"]).output()?;
    assert!(output.status.success());

    let table = parse_stdout(&output)?;
    assert_eq!(table["shared"]["description"], "from a");
    assert_eq!(table["shared"]["source"]["name"], "a.js");

    Ok(())
}

#[test]
fn test_extract_from_subdirectory_uses_config_root() -> Result<()> {
    let test = CliTest::with_file("lib/a.js", "/** comment */\nvar a;\n")?;
    test.write_file("tools/build.js", "/** comment */\nvar build;\n")?;
    test.write_file(".docliftrc.json", r#"{ "includes": ["lib"] }"#)?;

    let output = test
        .extract_command()
        .current_dir(test.root().join("tools"))
        .output()?;
    assert!(output.status.success());

    let table = parse_stdout(&output)?;
    assert_eq!(ids(&table), vec!["a"]);
    assert_eq!(table["a"]["source"]["name"], "../lib/a.js");

    Ok(())
}

#[test]
fn test_extract_output_file() -> Result<()> {
    let test = CliTest::with_file("src/a.js", "/** comment */\nvar a;\n")?;

    let output = test
        .extract_command()
        .args(["--output", "docs.json"])
        .output()?;
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let table: Value = serde_json::from_str(&test.read_file("docs.json")?)?;
    assert_eq!(ids(&table), vec!["a"]);

    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("--> docs.json"));

    Ok(())
}

#[test]
fn test_extract_reports_overrides() -> Result<()> {
    let test = CliTest::with_file("src/a.js", "/** first */\nvar shared;\n")?;
    test.write_file("src/b.js", "\n/** second */\nvar shared;\n")?;

    let output = test.extract_command().output()?;
    assert!(output.status.success());

    let table = parse_stdout(&output)?;
    assert_eq!(table["shared"]["description"], "second");

    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("`shared` at src/b.js:3 overrides the definition at src/a.js:2"));

    Ok(())
}

#[test]
fn test_extract_fixed_point() -> Result<()> {
    // `A` inherits from `B`, which only turns out to be a class further down
    let code = r#"
/**
 * comment
 * @extends B
 */
var A = function() {};

/** comment */
var B = function() {};

/** comment */
B.prototype.run = function() {};
"#;
    let test = CliTest::with_file("src/a.js", code)?;

    let single = parse_stdout(&test.extract_command().output()?)?;
    assert_eq!(single["B"]["kind"], "class");
    assert_eq!(single["A"]["kind"], "function");

    let fixed = parse_stdout(&test.extract_command().arg("--fixed-point").output()?)?;
    assert_eq!(fixed["A"]["kind"], "class");

    Ok(())
}

#[test]
fn test_extract_utility_namespaces_from_config() -> Result<()> {
    let test = CliTest::with_file(
        "src/a.js",
        "/** comment */\nvar mixed = $.extend({});\n/** comment */\nvar Derived = _.extend({});\n",
    )?;
    test.write_file(".docliftrc.json", r#"{ "utilityNamespaces": ["$"] }"#)?;

    let table = parse_stdout(&test.extract_command().output()?)?;
    assert_eq!(table["mixed"]["kind"], "member");
    assert_eq!(table["Derived"]["kind"], "class");

    Ok(())
}

#[test]
fn test_extract_parse_error() -> Result<()> {
    let test = CliTest::with_file("src/broken.js", "var = ;")?;

    let output = test.extract_command().output()?;
    assert_eq!(output.status.code(), Some(2));

    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.starts_with("Error:"));
    assert!(stderr.contains("src/broken.js"));

    Ok(())
}

#[test]
fn test_extract_invalid_config() -> Result<()> {
    let test = CliTest::with_file("src/a.js", "/** comment */\nvar a;\n")?;
    test.write_file(".docliftrc.json", r#"{ "ignores": ["[invalid"] }"#)?;

    let output = test.extract_command().output()?;
    assert_eq!(output.status.code(), Some(2));

    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("ignores"));

    Ok(())
}

#[test]
fn test_no_command_prints_help() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().output()?;
    assert!(output.status.success());
    assert!(String::from_utf8(output.stdout)?.contains("extract"));

    Ok(())
}
