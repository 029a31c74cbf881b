//! Benchmarks for raster packing, quantization and font table export.
//!
//! Glyphs are synthesized from a checkerboard-ish predicate so no font files are needed.

use bitfont::{
    quantize, BitDepth, BitRaster, FontBlock, FontExporter, FontFormat, Glyph, NativePixelFormat,
    PackMode, Palette, Rgba, RgbaBuffer, UnicodeBlock,
};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn synth_glyph(code_point: u32) -> Glyph {
    let mut raster = BitRaster::new(12, 16, PackMode::BitPacked).unwrap();
    raster.convert_from_predicate(|x, y| (x + y + code_point as usize) % 3 == 0);
    Glyph::new(code_point, raster, 1, 12, 13)
}

fn synth_block(block: &UnicodeBlock) -> FontBlock {
    let mut out = FontBlock::from_unicode(block);
    for code_point in block.range() {
        out.add_glyph(synth_glyph(code_point));
    }
    out
}

fn bench_raster(c: &mut Criterion) {
    c.bench_function("predicate_320x240_aligned", |b| {
        let mut raster = BitRaster::new(320, 240, PackMode::ByteAligned).unwrap();
        b.iter(|| {
            raster.convert_from_predicate(|x, y| black_box((x ^ y) & 1 == 0));
            black_box(raster.as_bytes().len())
        })
    });

    let aligned = {
        let mut r = BitRaster::new(320, 240, PackMode::ByteAligned).unwrap();
        r.convert_from_predicate(|x, y| (x * y) % 7 == 0);
        r
    };
    c.bench_function("repack_320x240", |b| {
        b.iter(|| black_box(aligned.repacked(PackMode::BitPacked)))
    });
}

fn bench_quantize(c: &mut Criterion) {
    let palette = Palette::grey(BitDepth::Four);
    let pixels = (0..128 * 128)
        .map(|i| {
            let v = (i % 256) as u8;
            Rgba::new(v, v / 2, 255 - v, (i % 255) as u8)
        })
        .collect();
    let image = RgbaBuffer::new(128, 128, pixels).unwrap();
    c.bench_function("quantize_128x128_4bpp", |b| {
        b.iter(|| {
            black_box(quantize(
                &image,
                NativePixelFormat::Palette4Bpp,
                &palette,
                10.0,
                true,
            ))
        })
    });
}

fn bench_export(c: &mut Criterion) {
    let blocks: Vec<FontBlock> = ["basic-latin", "latin-1-supplement", "cyrillic"]
        .iter()
        .filter_map(|name| UnicodeBlock::find(name))
        .map(|b| synth_block(&b))
        .collect();

    for format in [FontFormat::Adafruit, FontFormat::TcUnicode] {
        let exporter = FontExporter::new(format);
        c.bench_function(&format!("export_{format:?}"), |b| {
            b.iter(|| black_box(exporter.to_bytes(black_box(&blocks))))
        });
    }
}

criterion_group!(benches, bench_raster, bench_quantize, bench_export);
criterion_main!(benches);
