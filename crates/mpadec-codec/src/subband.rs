//! 反量化后的子带样本缓冲

use crate::tables::{LAYER2_SLOTS, SBLIMIT};

/// 一帧反量化后的子带样本
///
/// 按 `[声道][时隙][子带]` 存放, 每个时隙的 32 个子带样本正好是合成滤波器一次迭代的输入.
/// 未编码的子带 (分配为 0) 保持为 0.
#[derive(Debug, Clone)]
pub struct SubbandFrame {
    /// 本帧声道数 (1 或 2)
    channels: usize,
    /// 本帧时隙数 (Layer I 为 12, Layer II 为 36)
    slots: usize,
    samples: [[[f32; SBLIMIT]; LAYER2_SLOTS]; 2],
}

impl Default for SubbandFrame {
    fn default() -> Self {
        Self {
            channels: 0,
            slots: 0,
            samples: [[[0.0; SBLIMIT]; LAYER2_SLOTS]; 2],
        }
    }
}

impl SubbandFrame {
    /// 清零并设置本帧形状
    pub fn reset(&mut self, channels: usize, slots: usize) {
        debug_assert!(channels <= 2 && slots <= LAYER2_SLOTS);
        self.channels = channels;
        self.slots = slots;
        for ch in self.samples.iter_mut() {
            for slot in ch.iter_mut() {
                slot.fill(0.0);
            }
        }
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    /// 写入一个子带样本
    #[inline]
    pub fn set(&mut self, ch: usize, slot: usize, sb: usize, value: f32) {
        self.samples[ch][slot][sb] = value;
    }

    /// 读取一个子带样本
    #[inline]
    pub fn get(&self, ch: usize, slot: usize, sb: usize) -> f32 {
        self.samples[ch][slot][sb]
    }

    /// 指定声道、时隙的 32 个子带样本
    pub fn slot(&self, ch: usize, slot: usize) -> &[f32; SBLIMIT] {
        &self.samples[ch][slot]
    }
}
