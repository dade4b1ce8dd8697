use chip::{chip8::ChipSet, opcode::Opcode, resources::Rom};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const ROM_NAME: &str = "COUNTER";

/// counts V0 up and draws the matching glyph forever
const ROM_DATA: [Opcode; 6] = [0x6000, 0x7001, 0x8106, 0xF029, 0xD235, 0x1202];

static BASE_ROM: once_cell::sync::Lazy<Rom> = once_cell::sync::Lazy::new(|| {
    let data: Vec<u8> = ROM_DATA.iter().flat_map(|op| op.to_be_bytes()).collect();
    Rom::new(ROM_NAME, data).expect("The bench rom fits into memory.")
});

/// will setup the default configured chip
fn get_default_chip() -> ChipSet {
    let mut chip = ChipSet::new();
    chip.load_rom(&BASE_ROM)
        .expect("The bench rom is always loadable.");
    chip
}

pub fn step_bench(c: &mut Criterion) {
    let mut chip = get_default_chip();
    c.bench_function("step_bench", |b| {
        b.iter(|| {
            for _ in 0..1000 {
                let _ = black_box(chip.step());
            }
        });
    });
}

pub fn print_bench(c: &mut Criterion) {
    let chip = get_default_chip();
    c.bench_function("print_bench", |b| {
        b.iter(|| {
            let _ = format!("{}", chip);
        });
    });
}

criterion_group!(benches, step_bench, print_bench);
criterion_main!(benches);
