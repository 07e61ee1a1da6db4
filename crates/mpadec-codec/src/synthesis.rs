//! 多相合成滤波器组
//!
//! 每次迭代消费一个时隙的 32 个子带样本, 产出 32 个时域 PCM 样本 (浮点, 名义范围 [-1, 1)).
//! 每个声道持有独立的 1024 项 V 缓冲, 跨帧保持.

use crate::tables::{SBLIMIT, SYNTH_WINDOW, synth_matrix};

/// V 缓冲长度
const V_SIZE: usize = 1024;
const V_MASK: usize = V_SIZE - 1;

/// 单声道合成滤波器状态
#[derive(Debug, Clone)]
pub struct SynthContext {
    v: [f32; V_SIZE],
    /// 本次迭代写入 V 的起点, 每次迭代后退 64 (模 1024)
    offset: usize,
}

impl Default for SynthContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SynthContext {
    /// 创建静音状态的合成器
    pub fn new() -> Self {
        Self {
            v: [0.0; V_SIZE],
            // 首次迭代后退到 0
            offset: 64,
        }
    }

    /// 对一个时隙执行合成
    pub fn synthesize(&mut self, subbands: &[f32; SBLIMIT], pcm: &mut [f32; SBLIMIT]) {
        let matrix = synth_matrix();

        self.offset = (self.offset + V_SIZE - 64) & V_MASK;

        // 矩阵化: V[offset + i] = sum_k N[i][k] * S[k]
        for (i, row) in matrix.iter().enumerate() {
            let sum: f32 = row.iter().zip(subbands).map(|(n, s)| n * s).sum();
            self.v[self.offset + i] = sum;
        }

        // 加窗求和
        for (j, out) in pcm.iter_mut().enumerate() {
            let mut sum = 0.0f32;
            for i in 0..16 {
                let k = j + (i << 5);
                let idx = (self.offset + k + (((i + 1) >> 1) << 6)) & V_MASK;
                sum += SYNTH_WINDOW[k] * self.v[idx];
            }
            *out = sum;
        }
    }
}
