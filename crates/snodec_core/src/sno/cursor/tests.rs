use crate::sno::{Cursor, Endianness, SnoError, Whence};

#[test]
fn reads_mixed_endianness() {
	let mut cursor = Cursor::from_bytes(vec![0x01, 0x02, 0x01, 0x02, 0xff, 0xff, 0xff, 0xff]);
	assert_eq!(cursor.read_u16(Endianness::Little).expect("le read"), 0x0201);
	assert_eq!(cursor.read_u16(Endianness::Big).expect("be read"), 0x0102);
	assert_eq!(cursor.read_i32_le().expect("i32 read"), -1);
	assert_eq!(cursor.position().expect("position"), 8);
}

#[test]
fn reads_floats_and_wide_integers() {
	let mut bytes = 1.5_f32.to_le_bytes().to_vec();
	bytes.extend_from_slice(&(-7_i64).to_le_bytes());
	bytes.extend_from_slice(&0x0102_0304_0506_0708_u64.to_be_bytes());

	let mut cursor = Cursor::from_bytes(bytes);
	assert_eq!(cursor.read_f32_le().expect("f32"), 1.5);
	assert_eq!(cursor.read_i64_le().expect("i64"), -7);
	assert_eq!(cursor.read_u64(Endianness::Big).expect("u64"), 0x0102_0304_0506_0708);
}

#[test]
fn read_past_end_is_unexpected_eof() {
	let mut cursor = Cursor::from_bytes(vec![1, 2]);
	let err = cursor.read_u32_le().expect_err("short read should fail");
	assert!(matches!(err, SnoError::UnexpectedEof { at: 0, need: 4 }));
	assert!(err.is_unexpected_eof());
}

#[test]
fn rebase_redefines_start_relative_seeks() {
	let mut cursor = Cursor::from_bytes((0_u8..32).collect::<Vec<_>>());
	cursor.rebase(10).expect("rebase");

	assert_eq!(cursor.seek(0, Whence::Start).expect("seek to origin"), 0);
	assert_eq!(cursor.absolute_position().expect("absolute"), 10);
	assert_eq!(cursor.read_u8().expect("read at origin"), 10);

	let err = cursor.seek(-1, Whence::Start).expect_err("seek before origin must fail");
	assert!(matches!(err, SnoError::SeekBeforeOrigin { target: -1, origin: 10 }));
}

#[test]
fn rebase_is_cumulative() {
	let mut cursor = Cursor::from_bytes((0_u8..32).collect::<Vec<_>>());
	cursor.rebase(4).expect("first rebase");
	cursor.rebase(6).expect("second rebase");
	assert_eq!(cursor.origin(), 10);
	assert_eq!(cursor.position().expect("position"), 0);
	assert_eq!(cursor.read_u8().expect("read"), 10);
}

#[test]
fn current_relative_seek_cannot_cross_origin() {
	let mut cursor = Cursor::from_bytes(vec![0; 16]);
	cursor.rebase(8).expect("rebase");
	cursor.skip(2).expect("skip forward");
	assert!(cursor.seek(-3, Whence::Current).is_err());
	assert_eq!(cursor.position().expect("position unchanged"), 2);
}

#[test]
fn at_position_restores_after_success_and_error() {
	let mut cursor = Cursor::from_bytes((0_u8..16).collect::<Vec<_>>());
	cursor.skip(3).expect("skip");

	let value = cursor.at_position(8, Whence::Start, |c| c.read_u8()).expect("read at 8");
	assert_eq!(value, 8);
	assert_eq!(cursor.position().expect("restored"), 3);

	let err = cursor.at_position(14, Whence::Start, |c| c.read_u32_le()).expect_err("read past end");
	assert!(err.is_unexpected_eof());
	assert_eq!(cursor.position().expect("restored after error"), 3);
}

#[test]
fn peek_does_not_consume() {
	let mut cursor = Cursor::from_bytes(7_i32.to_le_bytes().to_vec());
	assert_eq!(cursor.peek(|c| c.read_i32_le()).expect("peek"), 7);
	assert_eq!(cursor.read_i32_le().expect("read"), 7);
}

#[test]
fn size_ignores_origin_and_keeps_position() {
	let mut cursor = Cursor::from_bytes(vec![0; 20]);
	cursor.rebase(5).expect("rebase");
	cursor.skip(1).expect("skip");
	assert_eq!(cursor.size().expect("size"), 20);
	assert_eq!(cursor.position().expect("position"), 1);
}

#[test]
fn null_terminated_string_stops_at_nul_or_end() {
	let mut cursor = Cursor::from_bytes(b"Actor\0Tail".to_vec());
	assert_eq!(cursor.read_null_terminated_string().expect("first"), "Actor");
	assert_eq!(cursor.read_null_terminated_string().expect("unterminated"), "Tail");
	assert_eq!(cursor.read_null_terminated_string().expect("at end"), "");
}

#[test]
fn read_bytes_reports_short_buffers() {
	let mut cursor = Cursor::from_bytes(vec![1, 2, 3]);
	assert_eq!(cursor.read_bytes(2).expect("two bytes"), vec![1, 2]);
	let err = cursor.read_bytes(5).expect_err("not enough bytes");
	assert!(matches!(err, SnoError::UnexpectedEof { at: 2, need: 5 }));
}
