/// Message types of the Sass Embedded Protocol (package `sass.embedded_protocol`),
/// as produced by `prost-build` from `embedded_sass.proto` and committed here.
///
/// The wire framing which carries these messages (varint length, varint
/// compilation ID, message bytes) is not part of the protobuf schema and is
/// implemented by the host library.
pub mod embedded_protocol {
    include!("sass.embedded_protocol.rs");
}
