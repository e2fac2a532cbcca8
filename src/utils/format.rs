const BYTES_PER_MEGABYTE: f64 = 1_048_576.0;

pub fn megabytes_string(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / BYTES_PER_MEGABYTE)
}
