use frostpane::{
    FastBlurParams, SurfaceMut, fast_box_blur, gaussian_iir, gaussian_iir_lanes, lane_support,
};

fn mean(data: &[u8]) -> f64 {
    data.iter().map(|&b| f64::from(b)).sum::<f64>() / data.len() as f64
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let (w, h) = (256u32, 160u32);
    let mut card = vec![0u8; (w * h * 4) as usize];
    for y in 0..h {
        for x in 0..w {
            let i = ((y * w + x) * 4) as usize;
            card[i] = if (x / 16 + y / 16) % 2 == 0 { 210 } else { 45 };
            card[i + 1] = (x * 255 / (w - 1)) as u8;
            card[i + 2] = (y * 255 / (h - 1)) as u8;
            card[i + 3] = 255;
        }
    }

    let mut frosted = card.clone();
    {
        let mut surface = SurfaceMut::new(&mut frosted, w, h)?;
        if lane_support() {
            gaussian_iir_lanes(&mut surface, 6.0, false)?;
        } else {
            gaussian_iir(&mut surface, 6.0, false)?;
        }
    }

    let mut fast = card.clone();
    {
        let mut surface = SurfaceMut::new(&mut fast, w, h)?;
        fast_box_blur(&mut surface, &FastBlurParams::default())?;
    }

    println!(
        "card mean {:.2}, gaussian mean {:.2} (lanes: {}), fast box mean {:.2}",
        mean(&card),
        mean(&frosted),
        lane_support(),
        mean(&fast)
    );

    Ok(())
}
