//! Test vectors from RFC 8613 Appendix C.

pub const MASTER_SECRET: [u8; 16] = [
    0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C,
    0x0D, 0x0E, 0x0F, 0x10,
];
pub const MASTER_SALT: [u8; 8] =
    [0x9E, 0x7C, 0xA9, 0x22, 0x23, 0x78, 0x63, 0x40];
pub const CLIENT_ID: [u8; 0] = [];
pub const SERVER_ID: [u8; 1] = [0x01];

pub const INFO_CLIENT_KEY: [u8; 9] =
    [0x85, 0x40, 0xF6, 0x0A, 0x63, 0x4B, 0x65, 0x79, 0x10];
pub const INFO_SERVER_KEY: [u8; 10] =
    [0x85, 0x41, 0x01, 0xF6, 0x0A, 0x63, 0x4B, 0x65, 0x79, 0x10];
pub const INFO_COMMON_IV: [u8; 8] =
    [0x85, 0x40, 0xF6, 0x0A, 0x62, 0x49, 0x56, 0x0D];

pub const CLIENT_KEY: [u8; 16] = [
    0xF0, 0x91, 0x0E, 0xD7, 0x29, 0x5E, 0x6A, 0xD4, 0xB5, 0x4F, 0xC7, 0x93,
    0x15, 0x43, 0x02, 0xFF,
];
pub const SERVER_KEY: [u8; 16] = [
    0xFF, 0xB1, 0x4E, 0x09, 0x3C, 0x94, 0xC9, 0xCA, 0xC9, 0x47, 0x16, 0x48,
    0xB4, 0xF9, 0x87, 0x10,
];
pub const COMMON_IV: [u8; 13] = [
    0x46, 0x22, 0xD4, 0xDD, 0x6D, 0x94, 0x41, 0x68, 0xEE, 0xFB, 0x54, 0x98,
    0x7C,
];

pub const REQ_PIV: [u8; 1] = [0x14];
pub const RES_PIV: [u8; 1] = [0x00];

pub const REQ_AAD_ARR: [u8; 8] =
    [0x85, 0x01, 0x81, 0x0A, 0x40, 0x41, 0x14, 0x40];
pub const REQ_AAD: [u8; 20] = [
    0x83, 0x68, 0x45, 0x6E, 0x63, 0x72, 0x79, 0x70, 0x74, 0x30, 0x40, 0x48,
    0x85, 0x01, 0x81, 0x0A, 0x40, 0x41, 0x14, 0x40,
];

pub const CLIENT_NONCE: [u8; 13] = [
    0x46, 0x22, 0xD4, 0xDD, 0x6D, 0x94, 0x41, 0x68, 0xEE, 0xFB, 0x54, 0x98,
    0x68,
];
pub const SERVER_NONCE: [u8; 13] = [
    0x47, 0x22, 0xD4, 0xDD, 0x6D, 0x94, 0x41, 0x69, 0xEE, 0xFB, 0x54, 0x98,
    0x7C,
];
