use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use h264_rtp::{H264Packetizer, PacketizerConfig, Packetizer, PayloadKind, PayloadSink, TimeBase};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "h264-packetize",
    about = "Show how an Annex B H.264 access unit is split into RTP payloads"
)]
struct Args {
    /// Annex B file holding one access unit
    input: PathBuf,

    /// Largest RTP payload in bytes (MTU minus IP/UDP/RTP overhead)
    #[arg(long, short = 'm', default_value_t = h264_rtp::config::DEFAULT_MAX_PAYLOAD)]
    max_payload: usize,

    /// Most NAL units per STAP-A payload (1..=9)
    #[arg(long, default_value_t = h264_rtp::config::DEFAULT_MAX_AGGREGATED_UNITS)]
    max_units: usize,

    /// Presentation timestamp in --time-base units
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pts: i64,

    /// Source time base as num/den
    #[arg(long, default_value = "1/90000")]
    time_base: TimeBase,

    /// Destination RTP clock rate in Hz
    #[arg(long, default_value_t = h264_rtp::VIDEO_CLOCK_RATE)]
    clock_rate: u32,

    /// Print the SDP attributes after the payload plan
    #[arg(long)]
    sdp: bool,
}

/// Prints one line per payload instead of sending it.
struct PrintSink {
    index: usize,
}

impl PayloadSink for PrintSink {
    fn send_payload(
        &mut self,
        payload: &[u8],
        rtp_timestamp: u32,
        marker: bool,
    ) -> h264_rtp::Result<()> {
        println!(
            "{:>4}  ts={:<10} len={:<5} {}{}",
            self.index,
            rtp_timestamp,
            payload.len(),
            PayloadKind::classify(payload),
            if marker { "  [marker]" } else { "" }
        );
        self.index += 1;
        Ok(())
    }
}

fn run(args: Args) -> h264_rtp::Result<()> {
    let config = PacketizerConfig {
        max_payload: args.max_payload,
        max_aggregated_units: args.max_units,
        clock_rate: args.clock_rate,
        ..PacketizerConfig::default()
    };
    let mut packetizer = H264Packetizer::new(config)?;

    let data = std::fs::read(&args.input)?;
    tracing::info!(path = %args.input.display(), bytes = data.len(), "access unit loaded");

    let au = packetizer.packetize(&data, args.pts, args.time_base)?;
    au.deliver(&mut PrintSink { index: 0 })?;
    println!(
        "{} payloads, {} bytes, rtp timestamp {}",
        au.len(),
        au.total_bytes(),
        au.rtp_timestamp()
    );

    if args.sdp {
        for attr in packetizer.sdp_attributes() {
            println!("{attr}");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Failed to packetize: {}", e);
            ExitCode::FAILURE
        }
    }
}
