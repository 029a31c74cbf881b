use assert_cmd::Command;
use bitfont::{test_support::glyph_from_rows, FontBlock, FontExporter, FontFormat};
use predicates::prelude::*;

fn bitfont() -> Command {
    Command::cargo_bin("bitfont").unwrap()
}

#[test]
fn blocks_lists_known_ranges() {
    bitfont()
        .arg("blocks")
        .assert()
        .success()
        .stdout(predicate::str::contains("basic-latin"))
        .stdout(predicate::str::contains("U+0020..U+007E"));
}

#[test]
fn inspect_reports_glyphs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("font.bin");

    let mut block = FontBlock::new("Digits", '0' as u32, '9' as u32);
    block.add_glyph(glyph_from_rows('1' as u32, &[".#", "##", ".#"], 3));
    block.add_glyph(glyph_from_rows('7' as u32, &["###", "..#", ".#."], 4));
    let bytes = FontExporter::new(FontFormat::TcUnicode)
        .to_bytes(&[block])
        .unwrap();
    std::fs::write(&path, bytes).unwrap();

    bitfont()
        .args(["inspect", "--format", "tc-unicode", "--input"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Defined glyphs: 2"))
        .stdout(predicate::str::contains("Block U+0030..U+0039: 2 glyphs"));
}

#[test]
fn inspect_rejects_garbage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("junk.bin");
    std::fs::write(&path, [1, 2, 3, 4, 5]).unwrap();

    bitfont()
        .args(["inspect", "--input"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing descriptor"));
}

#[test]
fn bitmap_writes_c_array() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("dot.png");
    let mut img = image::RgbaImage::from_pixel(8, 2, image::Rgba([0, 0, 0, 255]));
    img.put_pixel(0, 0, image::Rgba([255, 255, 255, 255]));
    img.put_pixel(7, 1, image::Rgba([255, 255, 255, 255]));
    img.save(&input).unwrap();

    bitfont()
        .args(["bitmap", "--name", "dot", "--input"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "const uint8_t dotData[] PROGMEM = {\n    0x80, 0x01,\n};",
        ));
}

#[test]
fn font_requires_a_font() {
    bitfont()
        .args(["font", "--output", "out.bin"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no font given"));
}

#[test]
fn font_job_file_is_used() {
    let dir = tempfile::tempdir().unwrap();
    let job = dir.path().join("job.toml");
    std::fs::write(
        &job,
        "font = \"missing.ttf\"\noutput = \"out.h\"\nblocks = [\"basic-latin\"]\nformat = \"tc-unicode\"\n",
    )
    .unwrap();

    bitfont()
        .args(["font", "--config"])
        .arg(&job)
        .assert()
        .failure()
        .stderr(predicate::str::contains("loading font missing.ttf"));
}

#[test]
fn font_job_rejects_unknown_format() {
    let dir = tempfile::tempdir().unwrap();
    let job = dir.path().join("job.toml");
    std::fs::write(&job, "font = \"a.ttf\"\noutput = \"o.bin\"\nformat = \"bdf\"\n").unwrap();

    bitfont()
        .args(["font", "--config"])
        .arg(&job)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid format \"bdf\""));
}

const DEJAVU_SANS: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../bitfont/tests/truetype/DejaVuSans.ttf"
);

#[test]
fn font_exports_binary_table() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("dejavu16.bin");

    bitfont()
        .args(["font", "--font", DEJAVU_SANS, "--size", "16", "--blocks", "basic-latin"])
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains("Exported 95 glyphs"));

    let bytes = std::fs::read(&output).unwrap();
    let summary = bitfont::inspect::inspect(&bytes, FontFormat::Adafruit).unwrap();
    assert_eq!(summary.index_range, Some((0x20, 0x7E)));
    assert_eq!(summary.glyph('H' as u32).unwrap().record.height, 11);
}

#[test]
fn font_writes_c_source() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("dejavu16.h");

    bitfont()
        .args(["font", "--font", DEJAVU_SANS, "--size", "16", "--name", "dejavu16", "--c-source"])
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.contains("const GFXfont dejavu16 PROGMEM"));
    assert!(text.contains("// U+0048 'H'"));
}

#[test]
fn preview_prints_text_art() {
    bitfont()
        .args(["preview", "--font", DEJAVU_SANS, "--size", "16", "--text", "Hg"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hg (19x14)"))
        .stdout(predicate::str::contains("█"));
}
