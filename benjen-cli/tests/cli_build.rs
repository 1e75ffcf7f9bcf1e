use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

const BASE_CONFIG: &str = r#"
root_url: "https://example.com/blog"
path: "out"
per_page: 2
recent_posts: 5
"#;

const INDEX_TEMPLATE: &str = r#"{% extends "top.html" %}{% block body %}page={{ page }}/{{ pages }} posts={% for p in posts %}[{{ p.date }}]{% endfor %} prev={% if prev %}{{ prev }}{% endif %} next={% if next %}{{ next }}{% endif %} recent={% for r in recent_posts %}[{{ r.title }}]{% endfor %}{% endblock body %}"#;

fn write_site(config: &str, entries: &[(&str, &str)]) -> Result<TempDir, Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let root = dir.path();

    fs::write(root.join("config.yaml"), config)?;

    let templates = root.join("templates");
    fs::create_dir_all(&templates)?;
    fs::write(
        templates.join("top.html"),
        "<html>{% block body %}{% endblock body %}</html>",
    )?;
    fs::write(templates.join("index.html"), INDEX_TEMPLATE)?;
    fs::write(
        templates.join("archive.html"),
        "{% for p in posts %}[{{ p.date }}]{% endfor %}",
    )?;
    fs::write(
        templates.join("post.html"),
        "<h1>{{ post.title }}</h1>{{ post.html | safe }}",
    )?;
    fs::write(templates.join("about.html"), "About page")?;

    let assets = root.join("static").join("css");
    fs::create_dir_all(&assets)?;
    fs::write(assets.join("site.css"), "body {}")?;

    let entries_dir = root.join("entries");
    fs::create_dir_all(&entries_dir)?;
    for (name, body) in entries {
        fs::write(entries_dir.join(name), body)?;
    }

    Ok(dir)
}

fn run(root: &Path) -> assert_cmd::assert::Assert {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("benjen").expect("benjen binary");
    cmd.current_dir(root)
        .args(["--config", "config.yaml", "build"])
        .assert()
}

fn read(root: &Path, name: &str) -> String {
    fs::read_to_string(root.join("out").join(name)).unwrap_or_default()
}

const THREE_ENTRIES: [(&str, &str); 3] = [
    ("one.md", "title: One\ndate: 2020-01-01\n\nFirst body."),
    ("two.md", "title: Two\ndate: 2020-01-02\n\nSecond body."),
    ("three.md", "title: Three\ndate: 2020-01-03\n\nThird body."),
];

#[test]
fn build_paginates_main_stream() -> Result<(), Box<dyn std::error::Error>> {
    let dir = write_site(BASE_CONFIG, &THREE_ENTRIES)?;
    run(dir.path())
        .success()
        .stdout(predicate::str::contains("Processed Three"));

    let index = read(dir.path(), "index.html");
    assert!(index.contains("page=1/2"));
    assert!(index.contains("posts=[2020-01-03][2020-01-02] "));
    assert!(index.contains("prev= "));
    assert!(index.contains("next=index_1.html "));
    assert!(index.contains("recent=[Three][Two][One]"));

    let second = read(dir.path(), "index_1.html");
    assert!(second.contains("page=2/2"));
    assert!(second.contains("posts=[2020-01-01] "));
    assert!(second.contains("prev=index.html "));
    assert!(second.contains("next= "));

    assert!(!dir.path().join("out/index_2.html").exists());
    assert_eq!(
        read(dir.path(), "archive.html"),
        "[2020-01-03][2020-01-02][2020-01-01]"
    );
    assert_eq!(
        read(dir.path(), "2020-01-02_Two.html"),
        "<h1>Two</h1><p>Second body.</p>\n"
    );
    Ok(())
}

#[test]
fn build_routes_galley_entries_separately() -> Result<(), Box<dyn std::error::Error>> {
    let mut entries = THREE_ENTRIES.to_vec();
    entries.push((
        "photos.md",
        "title: Photos\ndate: 2020-02-01\ntags: galley\n\nimage[sunset, vacation2020, A nice sunset]\n",
    ));
    let dir = write_site(BASE_CONFIG, &entries)?;
    run(dir.path()).success();

    let index = read(dir.path(), "index.html");
    assert!(!index.contains("2020-02-01"));
    assert!(!read(dir.path(), "archive.html").contains("2020-02-01"));

    let galley = read(dir.path(), "galley.html");
    assert!(galley.contains("posts=[2020-02-01] "));
    // Galley pages share the main stream's recent list
    assert!(galley.contains("recent=[Three][Two][One]"));
    assert!(!dir.path().join("out/galley_1.html").exists());

    let post = read(dir.path(), "2020-02-01_Photos.html");
    assert!(post.contains(
        r#"<div class="single"><a href="img/sunset.small.jpg" rel="lightbox[vacation2020]" title="A nice sunset"><img src="img/sunset.thumb.jpg" alt="A nice sunset" /></a></div>"#
    ));
    Ok(())
}

#[test]
fn build_skips_entries_without_required_metadata() -> Result<(), Box<dyn std::error::Error>> {
    let dir = write_site(
        BASE_CONFIG,
        &[
            ("ok.md", "title: Kept\ndate: 2020-01-01\n\nBody"),
            ("untitled.md", "date: 2020-01-05\n\nBody"),
        ],
    )?;
    run(dir.path()).success();

    assert!(read(dir.path(), "index.html").contains("posts=[2020-01-01] "));
    assert_eq!(read(dir.path(), "archive.html"), "[2020-01-01]");
    Ok(())
}

#[test]
fn build_copies_static_assets_and_passthrough_pages() -> Result<(), Box<dyn std::error::Error>> {
    let dir = write_site(BASE_CONFIG, &THREE_ENTRIES)?;
    run(dir.path())
        .success()
        .stdout(predicate::str::contains("Processing about.html"));

    assert_eq!(read(dir.path(), "css/site.css"), "body {}");
    assert_eq!(read(dir.path(), "about.html"), "About page");
    assert!(!dir.path().join("out/top.html").exists());
    Ok(())
}

#[test]
fn build_wipes_previous_output() -> Result<(), Box<dyn std::error::Error>> {
    let dir = write_site(BASE_CONFIG, &THREE_ENTRIES)?;
    fs::create_dir_all(dir.path().join("out"))?;
    fs::write(dir.path().join("out/stale.html"), "old")?;

    run(dir.path()).success();
    assert!(!dir.path().join("out/stale.html").exists());

    run(dir.path()).success();
    assert!(dir.path().join("out/index.html").exists());
    Ok(())
}

#[test]
fn feed_skipped_without_rss_config() -> Result<(), Box<dyn std::error::Error>> {
    let config = format!("{}rss_title: \"Blog\"\n", BASE_CONFIG);
    let dir = write_site(&config, &THREE_ENTRIES)?;
    run(dir.path()).success();

    assert!(!dir.path().join("out/feed.xml").exists());
    Ok(())
}

#[test]
fn feed_lists_main_then_galley_entries() -> Result<(), Box<dyn std::error::Error>> {
    let config = format!(
        "{}rss_title: \"Blog\"\nrss_description: \"All posts\"\n",
        BASE_CONFIG
    );
    let mut entries = THREE_ENTRIES.to_vec();
    entries.push((
        "photos.md",
        "title: Photos\ndate: 2020-02-01\ntags: galley\n\nSome pictures.",
    ));
    entries.push(("draft.md", "title: Draft\n\nNo date yet."));
    let dir = write_site(&config, &entries)?;
    run(dir.path()).success();

    let feed = read(dir.path(), "feed.xml");
    assert_eq!(feed.matches("<item>").count(), 4);
    assert!(!feed.contains("Draft"));
    assert!(feed.contains("<link>https://example.com/blog/</link>"));
    assert!(feed.contains(
        "<link>https://example.com/blog/2020-01-03_Three.html</link><description>&lt;p&gt;Third body.&lt;/p&gt;\n</description><guid isPermaLink=\"true\">https://example.com/blog/2020-01-03_Three.html</guid>"
    ));

    let three = feed.find("2020-01-03_Three.html").unwrap_or(usize::MAX);
    let one = feed.find("2020-01-01_One.html").unwrap_or(usize::MAX);
    let photos = feed.find("2020-02-01_Photos.html").unwrap_or(0);
    assert!(three < one);
    assert!(one < photos);
    Ok(())
}

#[test]
fn malformed_directive_aborts_build() -> Result<(), Box<dyn std::error::Error>> {
    let dir = write_site(
        BASE_CONFIG,
        &[("broken.md", "title: Broken\ndate: 2020-01-01\n\nimage[name, group]\n")],
    )?;

    run(dir.path())
        .failure()
        .stderr(predicate::str::contains("broken.md"))
        .stderr(predicate::str::contains("expects 3 comma-separated fields, got 2"));
    Ok(())
}

#[test]
fn missing_config_key_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = write_site("root_url: x\npath: out\nper_page: 2\n", &THREE_ENTRIES)?;

    run(dir.path())
        .failure()
        .stderr(predicate::str::contains("recent_posts"));
    Ok(())
}
