#[cfg(feature = "tensor")]
pub use tensor::ToTensor;

#[cfg(feature = "tensor")]
mod tensor {
    use tch::Tensor;

    pub trait ToTensor {
        fn to_tensor(&self) -> Tensor;
    }

    // 网络一般用 f32，转换时加上 batch 维
    impl ToTensor for [f64] {
        fn to_tensor(&self) -> Tensor {
            let values: Vec<f32> = self.iter().map(|v| *v as f32).collect();
            Tensor::from_slice(&values).unsqueeze(0)
        }
    }

    impl<const N: usize> ToTensor for [f64; N] {
        fn to_tensor(&self) -> Tensor {
            self.as_slice().to_tensor()
        }
    }

    impl ToTensor for Vec<f64> {
        fn to_tensor(&self) -> Tensor {
            self.as_slice().to_tensor()
        }
    }
}

#[cfg(feature = "plot")]
pub use plot::{plot_reward_map, plot_series};

#[cfg(feature = "plot")]
mod plot {
    use std::error::Error;
    use std::path::Path;

    use plotters::prelude::*;

    use crate::puddle::PuddleField;

    /// 折线图，横轴为序号（例如 episode）
    pub fn plot_series(
        values: &[f64],
        filename: impl AsRef<Path>,
        title: &str,
        y_desc: &str,
    ) -> Result<(), Box<dyn Error>> {
        let filename = filename.as_ref();
        let root = BitMapBackend::new(filename, (800, 600)).into_drawing_area();
        root.fill(&WHITE)?;

        let min_value = values.iter().copied().fold(f64::INFINITY, f64::min).min(0.0);
        let max_value = values.iter().copied().fold(f64::NEG_INFINITY, f64::max).max(1.0); // 避免空图或全为 0

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 32).into_font())
            .margin(30)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(0..values.len().max(1), min_value..max_value)?;

        chart
            .configure_mesh()
            .x_desc("Episode")
            .y_desc(y_desc)
            .axis_desc_style(("sans-serif", 22))
            .label_style(("sans-serif", 18))
            .light_line_style(&WHITE.mix(0.3))
            .draw()?;

        chart
            .draw_series(LineSeries::new(
                values.iter().enumerate().map(|(i, r)| (i, *r)),
                &BLUE,
            ))?
            .label(y_desc)
            .legend(|(x, y)| PathElement::new([(x, y), (x + 20, y)], &BLUE));

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .label_font(("sans-serif", 18))
            .draw()?;

        root.present()?;
        tracing::info!("Saved plot to {}", filename.display());
        Ok(())
    }

    /// 奖励越低颜色越深（黄 -> 棕）
    fn reward_color(reward: f64, min: f64, max: f64) -> RGBColor {
        let t = if max > min { (max - reward) / (max - min) } else { 0.0 };
        let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        RGBColor(lerp(255, 102), lerp(255, 37), lerp(229, 6))
    }

    /// 把 puddle 奖励图画成热力图，可选标出当前位置
    pub fn plot_reward_map(
        field: &PuddleField,
        position: Option<[f64; 2]>,
        resolution: usize,
        filename: impl AsRef<Path>,
    ) -> Result<(), Box<dyn Error>> {
        let filename = filename.as_ref();
        let resolution = resolution.max(2);
        let map = field.reward_map(resolution);
        let min = map.iter().flatten().copied().fold(f64::INFINITY, f64::min);
        let max = map.iter().flatten().copied().fold(f64::NEG_INFINITY, f64::max);

        let root = BitMapBackend::new(filename, (600, 600)).into_drawing_area();
        root.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(&root)
            .caption("Puddleworld", ("sans-serif", 24).into_font())
            .margin(20)
            .build_cartesian_2d(0.0..1.0, 0.0..1.0)?;

        let cell = 1.0 / resolution as f64;
        chart.draw_series(map.iter().enumerate().flat_map(|(j, row)| {
            row.iter().enumerate().map(move |(i, reward)| {
                let (x, y) = (i as f64 * cell, j as f64 * cell);
                Rectangle::new(
                    [(x, y), (x + cell, y + cell)],
                    reward_color(*reward, min, max).filled(),
                )
            })
        }))?;

        if let Some([x, y]) = position {
            chart.draw_series(std::iter::once(Circle::new((x, y), 8, BLUE.filled())))?;
        }

        root.present()?;
        tracing::info!("Saved reward map to {}", filename.display());
        Ok(())
    }

}
