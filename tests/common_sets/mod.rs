use aranges::Endian;

/// Append `value` as `width` bytes in the given byte order.
pub fn push_uint(out: &mut Vec<u8>, endian: Endian, value: u64, width: usize) {
    let bytes = value.to_le_bytes();
    match endian {
        Endian::Little => out.extend_from_slice(&bytes[..width]),
        Endian::Big => out.extend(bytes[..width].iter().rev()),
    }
}

/// Encode one arange set: header, alignment padding, descriptor tuples, and
/// the all-zero terminator. The length field is computed from the encoded
/// size, and the first tuple is padded onto a stride boundary measured from
/// the start of the set.
pub fn encode_set(
    endian: Endian,
    version: u16,
    cu_offset: u32,
    addr_size: u8,
    seg_size: u8,
    descriptors: &[(u64, u64)],
) -> Vec<u8> {
    let stride = seg_size as usize + 2 * addr_size as usize;
    let mut body = Vec::new();
    push_uint(&mut body, endian, version as u64, 2);
    push_uint(&mut body, endian, cu_offset as u64, 4);
    body.push(addr_size);
    body.push(seg_size);
    while (4 + body.len()) % stride != 0 {
        body.push(0);
    }
    let mut tuples: Vec<(u64, u64)> = descriptors.to_vec();
    tuples.push((0, 0));
    for (address, length) in tuples {
        body.extend(std::iter::repeat_n(0, seg_size as usize));
        push_uint(&mut body, endian, address, addr_size as usize);
        push_uint(&mut body, endian, length, addr_size as usize);
    }

    let mut out = Vec::with_capacity(4 + body.len());
    push_uint(&mut out, endian, body.len() as u64, 4);
    out.extend_from_slice(&body);
    out
}

/// Shorthand for the common case: little-endian, version 2, 4-byte
/// addresses, no segment selectors.
pub fn encode_set_le(cu_offset: u32, descriptors: &[(u64, u64)]) -> Vec<u8> {
    encode_set(Endian::Little, 2, cu_offset, 4, 0, descriptors)
}
