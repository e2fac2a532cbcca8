fn main() {
    std::process::exit(pdf_compressor_lib::run())
}
