#[tokio::main]
async fn main() {
    order_placer::start(std::env::args()).await;
}
