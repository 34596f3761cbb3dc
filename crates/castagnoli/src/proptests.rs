extern crate std;

use std::vec::Vec;

use proptest::prelude::*;

use super::*;

fn bytes(max: usize) -> impl Strategy<Value = Vec<u8>> {
  proptest::collection::vec(any::<u8>(), 0..=max)
}

proptest! {
  #[test]
  fn dispatched_matches_portable(data in bytes(4096)) {
    prop_assert_eq!(crc32c(&data), portable::slice8(!0, &data) ^ !0);
  }

  #[test]
  fn every_engine_matches_portable(data in bytes(2048), seed in any::<u32>()) {
    let expect = portable::slice8(seed, &data);
    for engine in engines() {
      prop_assert_eq!(engine.update(seed, &data), expect, "{}", engine.name());
    }
  }

  #[test]
  fn chunking_equivalence(data in bytes(4096), chunk in 1usize..=257) {
    let mut state = crc32c_init();
    for part in data.chunks(chunk) {
      state = crc32c_update(state, part);
    }
    prop_assert_eq!(crc32c_finish(state), crc32c(&data));
  }

  #[test]
  fn split_associativity(data in bytes(1024), split in any::<prop::sample::Index>(), seed in any::<u32>()) {
    let k = split.index(data.len() + 1);
    let (a, b) = data.split_at(k);
    prop_assert_eq!(crc32c_update(crc32c_update(seed, a), b), crc32c_update(seed, &data));
  }

  #[test]
  fn combine_correctness(a in bytes(1024), b in bytes(1024)) {
    let mut ab = a.clone();
    ab.extend_from_slice(&b);
    prop_assert_eq!(combine(crc32c(&a), crc32c(&b), b.len()), crc32c(&ab));
  }

  #[test]
  fn resume_correctness(data in bytes(1024), split in any::<prop::sample::Index>()) {
    let k = split.index(data.len() + 1);
    let (a, b) = data.split_at(k);
    let mut h = Crc32c::resume(crc32c(a));
    h.update(b);
    prop_assert_eq!(h.finalize(), crc32c(&data));
  }

  // ─────────────────────────────────────────────────────────────────────────────
  // Cross-validation against the crc32c crate
  // ─────────────────────────────────────────────────────────────────────────────

  #[test]
  fn matches_crc32c_crate(data in bytes(4096)) {
    prop_assert_eq!(crc32c(&data), ::crc32c::crc32c(&data));
  }

  #[test]
  fn streaming_matches_crc32c_crate(data in bytes(4096), chunk in 1usize..=257) {
    let mut ours = Crc32c::new();
    let mut reference = 0u32;
    for part in data.chunks(chunk) {
      ours.update(part);
      reference = ::crc32c::crc32c_append(reference, part);
    }
    prop_assert_eq!(ours.finalize(), reference);
  }

  // ─────────────────────────────────────────────────────────────────────────────
  // Algebra
  // ─────────────────────────────────────────────────────────────────────────────

  #[test]
  fn shift_tables_are_zero_padding(crc in any::<u32>()) {
    prop_assert_eq!(shift::SHORT_SHIFT.apply(crc), bitwise::compute(crc, &[0u8; shift::SHORT_BLOCK]));
  }

  #[test]
  fn zeros_operator_is_linear(x in any::<u32>(), y in any::<u32>(), log2 in 0u32..16) {
    let op = gf2::zeros_operator(1 << log2);
    prop_assert_eq!(op.mul_vec(x ^ y), op.mul_vec(x) ^ op.mul_vec(y));
  }
}
