//! Html subcommand tests

use assert_cmd::cargo::cargo_bin_cmd;

#[test]
fn test_html_stdin() {
    cargo_bin_cmd!("roundmark")
        .arg("html")
        .write_stdin("# Title\n\n- a\n- b\n")
        .assert()
        .success()
        .stdout("<h1>Title</h1>\n<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n");
}

#[test]
fn test_html_commonmark_by_default() {
    cargo_bin_cmd!("roundmark")
        .arg("html")
        .current_dir(std::env::temp_dir())
        .write_stdin("www.example.com\n")
        .assert()
        .success()
        .stdout("<p>www.example.com</p>\n");
}
