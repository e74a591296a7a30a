//! Writes a demo CSV for `SAMPLE_CSV_PATH`.
//!
//! Usage: `generate_sample [OUTPUT] [--sjis]`. `--sjis` writes Shift_JIS
//! instead of UTF-8 to exercise the loader's encoding fallback.

use anyhow::{Context, Result, bail};

/// Minimal deterministic PRNG (64-bit LCG).
struct SimpleRng(u64);

impl SimpleRng {
    fn next_u32(&mut self) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as u32
    }

    fn below(&mut self, n: u32) -> u32 {
        self.next_u32() % n
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len() as u32) as usize]
    }
}

/// One of the page cell spellings seen in real catalogues.
fn page_cell(rng: &mut SimpleRng) -> String {
    let page = 1 + rng.below(120);
    match rng.below(10) {
        0 => format!("{page}-{}", page + 1 + rng.below(3)),
        1 => format!("{page}〜{}", page + 2),
        2 => format!("p{page}"),
        3 => format!("P{page}~{}", page + 1),
        4 => "-".to_string(),
        5 => String::new(),
        _ => page.to_string(),
    }
}

fn main() -> Result<()> {
    let mut output = "sample.csv".to_string();
    let mut sjis = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--sjis" => sjis = true,
            flag if flag.starts_with('-') => bail!("unknown flag {flag}"),
            path => output = path.to_string(),
        }
    }

    let categories: [(&str, &[&str]); 3] = [
        ("食品", &["野菜", "果物", "飲料"]),
        ("雑貨", &["文具", "台所用品"]),
        ("衣料", &["紳士", "婦人", "子供"]),
    ];
    let notes = ["", "新商品", "季節限定", "再掲"];

    let mut rng = SimpleRng(42);
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(["商品ID", "大項目", "中項目", "ページ", "備考"])?;

    let rows = 200;
    for id in 1..=rows {
        let (major, minors) = categories[rng.below(categories.len() as u32) as usize];
        let minor = rng.pick(minors);
        writer.write_record([
            format!("A{id:04}"),
            major.to_string(),
            minor.to_string(),
            page_cell(&mut rng),
            rng.pick(&notes).to_string(),
        ])?;
    }

    let bytes = writer.into_inner().context("flushing CSV buffer")?;
    let bytes = if sjis {
        let text = String::from_utf8(bytes).context("CSV buffer is UTF-8")?;
        let (encoded, _, had_errors) = encoding_rs::SHIFT_JIS.encode(&text);
        if had_errors {
            bail!("sample text is not representable in Shift_JIS");
        }
        encoded.into_owned()
    } else {
        bytes
    };

    std::fs::write(&output, bytes).with_context(|| format!("writing {output}"))?;
    println!(
        "Wrote {rows} rows to {output} ({})",
        if sjis { "Shift_JIS" } else { "UTF-8" }
    );
    Ok(())
}
