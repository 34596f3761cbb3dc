use castagnoli::{
  EngineKind, engine, engines, portable,
  shift::{LONG_BLOCK, LONG_SHIFT, SHORT_BLOCK, SHORT_SHIFT},
};

fn gen_bytes(len: usize, seed: u64) -> Vec<u8> {
  let mut out = vec![0u8; len];
  let mut x = seed | 1;
  for b in &mut out {
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    *b = (x as u8).wrapping_add((x >> 8) as u8);
  }
  out
}

fn lengths() -> Vec<usize> {
  let mut out: Vec<usize> = (0..=64).collect();
  for block in [SHORT_BLOCK, LONG_BLOCK] {
    for k in 1..=4 {
      for delta in [-9isize, -1, 0, 1, 7, 8, 13] {
        out.push((block * k).saturating_add_signed(delta));
      }
    }
  }
  out.extend([127, 128, 129, 215, 216, 217, 223, 224, 240, 3 * 1024, 3 * 1024 + 24]);
  out.sort_unstable();
  out.dedup();
  out
}

#[test]
fn all_engines_agree_across_block_boundaries() {
  let data = gen_bytes(5 * LONG_BLOCK, 0x0123_4567_89AB_CDEF);
  for len in lengths() {
    let input = &data[..len];
    for seed in [0xFFFF_FFFFu32, 0, 0x1234_5678] {
      let expected = portable::slice8(seed, input);
      for e in engines() {
        assert_eq!(e.update(seed, input), expected, "{} len={len} seed={seed:#x}", e.name());
      }
    }
  }
}

#[test]
fn multi_megabyte_buffer() {
  let data = gen_bytes(3 * 1024 * 1024 + 5, 42);
  let expected = portable::slice8(!0, &data);
  for e in engines().filter(|e| e.kind() != EngineKind::Bitwise) {
    assert_eq!(e.update(!0, &data), expected, "{}", e.name());
  }
}

#[test]
fn clmul_matches_shift_table_path() {
  let (Some(clmul), Some(parallel)) = (engine(EngineKind::HardwareParallelClmul), engine(EngineKind::HardwareParallel))
  else {
    return;
  };
  let data = gen_bytes(200 * 24 + 7, 7);
  // Around the threshold, then across several 128-word blocks.
  for len in (150..300).chain([128 * 24, 128 * 24 + 1, 129 * 24, 200 * 24 + 7]) {
    let input = &data[..len];
    assert_eq!(clmul.update(!0, input), parallel.update(!0, input), "len={len}");
  }
}

#[test]
fn associativity() {
  let data = gen_bytes(3 * LONG_BLOCK + 100, 9);
  for e in engines().filter(|e| e.kind() != EngineKind::Bitwise) {
    let whole = e.update(!0, &data);
    for k in [0, 1, 7, 255, 769, LONG_BLOCK, data.len() - 1, data.len()] {
      let (a, b) = data.split_at(k);
      assert_eq!(e.update(e.update(!0, a), b), whole, "{} split={k}", e.name());
    }
  }
}

#[test]
fn shift_tables_equal_zero_runs() {
  for crc in [0xFFFF_FFFFu32, 1, 0xDEAD_BEEF] {
    assert_eq!(SHORT_SHIFT.apply(crc), portable::slice8(crc, &[0u8; SHORT_BLOCK]));
    assert_eq!(LONG_SHIFT.apply(crc), portable::slice8(crc, &vec![0u8; LONG_BLOCK]));
  }
}

#[test]
fn empty_input_leaves_state() {
  for e in engines() {
    for crc in [0u32, 0xFFFF_FFFF, 0x8000_0001] {
      assert_eq!(e.update(crc, &[]), crc, "{}", e.name());
    }
  }
}
