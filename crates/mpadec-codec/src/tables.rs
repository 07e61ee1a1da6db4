//! MPEG-1 音频 Layer I/II 解码用的固定查找表.
//!
//! 所有表都是只读常量, 或在首次使用时通过 `OnceLock` 计算一次.

use std::sync::OnceLock;

/// 每帧子带数
pub const SBLIMIT: usize = 32;

/// Layer I 每帧每子带的时隙数
pub const LAYER1_SLOTS: usize = 12;

/// Layer II 每帧每子带的时隙数 (12 组 x 3)
pub const LAYER2_SLOTS: usize = 36;

/// Layer I 比特率表 (kbps), 索引 0 为自由格式
pub const BITRATE_LAYER1: [u32; 15] = [
    0, 32, 64, 96, 128, 160, 192, 224, 256, 288, 320, 352, 384, 416, 448,
];

/// Layer II 比特率表 (kbps)
pub const BITRATE_LAYER2: [u32; 15] = [
    0, 32, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 384,
];

/// Layer III 比特率表 (kbps)
pub const BITRATE_LAYER3: [u32; 15] = [
    0, 32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320,
];

/// MPEG-1 采样率表 (Hz)
pub const SAMPLE_RATES: [u32; 3] = [44100, 48000, 32000];

/// 比例因子表: 第 i 项为 2^(1 - i/3), 共 63 项 (索引 63 为保留值)
#[allow(clippy::excessive_precision)]
pub const SCALE_FACTORS: [f32; 63] = [
    2.00000000000000, 1.58740105196820, 1.25992104989487, 1.00000000000000,
    0.79370052598410, 0.62996052494744, 0.50000000000000, 0.39685026299205,
    0.31498026247372, 0.25000000000000, 0.19842513149602, 0.15749013123686,
    0.12500000000000, 0.09921256574801, 0.07874506561843, 0.06250000000000,
    0.04960628287401, 0.03937253280921, 0.03125000000000, 0.02480314143700,
    0.01968626640461, 0.01562500000000, 0.01240157071850, 0.00984313320230,
    0.00781250000000, 0.00620078535925, 0.00492156660115, 0.00390625000000,
    0.00310039267963, 0.00246078330058, 0.00195312500000, 0.00155019633981,
    0.00123039165029, 0.00097656250000, 0.00077509816991, 0.00061519582514,
    0.00048828125000, 0.00038754908495, 0.00030759791257, 0.00024414062500,
    0.00019377454248, 0.00015379895629, 0.00012207031250, 0.00009688727124,
    0.00007689947814, 0.00006103515625, 0.00004844363562, 0.00003844973907,
    0.00003051757813, 0.00002422181781, 0.00001922486954, 0.00001525878906,
    0.00001211090890, 0.00000961243477, 0.00000762939453, 0.00000605545445,
    0.00000480621738, 0.00000381469727, 0.00000302772723, 0.00000240310869,
    0.00000190734863, 0.00000151386361, 0.00000120155435,
];

/// 按索引查找比例因子, 保留索引 63 视为静音
pub fn scale_factor(index: u32) -> f32 {
    SCALE_FACTORS.get(index as usize).copied().unwrap_or(0.0)
}

/// Layer I 线性反量化因子 2^nb / (2^nb - 1), nb 为样本位宽 (2..=16)
pub fn layer1_requant_factor(nb: u32) -> f32 {
    let pow = f64::from(1u32 << nb);
    (pow / (pow - 1.0)) as f32
}

/// Layer II 量化类别
///
/// 描述一种量化级数的码字格式及反量化常数.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantClass {
    /// 量化级数
    pub levels: u32,
    /// 码字位宽 (分组时为 3 个样本共用的位宽)
    pub bits: u32,
    /// 是否 3 样本分组编码
    pub grouped: bool,
    /// 反量化常数 C
    pub c: f32,
    /// 反量化常数 D
    pub d: f32,
}

impl QuantClass {
    /// 符号位所在位置, 即 floor(log2(levels))
    pub fn msb(&self) -> u32 {
        31 - self.levels.leading_zeros()
    }
}

const fn qc(levels: u32, bits: u32, grouped: bool, c: f32, d: f32) -> QuantClass {
    QuantClass {
        levels,
        bits,
        grouped,
        c,
        d,
    }
}

/// Layer II 量化类别表 (ISO/IEC 11172-3 表 B.4)
#[allow(clippy::excessive_precision)]
pub const QUANT_CLASSES: [QuantClass; 17] = [
    qc(3, 5, true, 1.33333333333, 0.50000000000),
    qc(5, 7, true, 1.60000000000, 0.50000000000),
    qc(7, 3, false, 1.14285714286, 0.25000000000),
    qc(9, 10, true, 1.77777777777, 0.50000000000),
    qc(15, 4, false, 1.06666666666, 0.12500000000),
    qc(31, 5, false, 1.03225806452, 0.06250000000),
    qc(63, 6, false, 1.01587301587, 0.03125000000),
    qc(127, 7, false, 1.00787401575, 0.01562500000),
    qc(255, 8, false, 1.00392156863, 0.00781250000),
    qc(511, 9, false, 1.00195694716, 0.00390625000),
    qc(1023, 10, false, 1.00097751711, 0.00195312500),
    qc(2047, 11, false, 1.00048851979, 0.00097656250),
    qc(4095, 12, false, 1.00024420024, 0.00048828125),
    qc(8191, 13, false, 1.00012208522, 0.00024414063),
    qc(16383, 14, false, 1.00006103888, 0.00012207031),
    qc(32767, 15, false, 1.00003051851, 0.00006103516),
    qc(65535, 16, false, 1.00001525902, 0.00003051758),
];

// 子带的分配码 -> 量化类别映射. 行长度为 2^nbal - 1, 分配码 0 表示不编码.
const ROW_HIGH_A: &[u8] = &[0, 2, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16];
const ROW_HIGH_B: &[u8] = &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 16];
const ROW_MID: &[u8] = &[0, 1, 2, 3, 4, 5, 16];
const ROW_LOW: &[u8] = &[0, 1, 16];
const ROW_LBR_HIGH: &[u8] = &[0, 1, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];
const ROW_LBR_LOW: &[u8] = &[0, 1, 3, 4, 5, 6, 7];

/// Layer II 比特分配表
#[derive(Debug)]
pub struct AllocTable {
    /// 表编号 (0-3, 对应标准中的 B.2a-B.2d)
    pub index: usize,
    /// 实际编码的子带数
    pub sblimit: usize,
    /// 每个子带的量化类别映射
    rows: &'static [&'static [u8]],
}

impl AllocTable {
    /// 子带分配码的位宽
    pub fn nbal(&self, sb: usize) -> u32 {
        (self.rows[sb].len() as u32 + 1).trailing_zeros()
    }

    /// 根据子带和非零分配码查找量化类别
    pub fn quant_class(&self, sb: usize, allocation: u32) -> &'static QuantClass {
        let class = self.rows[sb][allocation as usize - 1];
        &QUANT_CLASSES[class as usize]
    }
}

/// 表 B.2a: 27 个子带
const ALLOC_ROWS_A: [&[u8]; 27] = [
    ROW_HIGH_A, ROW_HIGH_A, ROW_HIGH_A, ROW_HIGH_B, ROW_HIGH_B, ROW_HIGH_B, ROW_HIGH_B,
    ROW_HIGH_B, ROW_HIGH_B, ROW_HIGH_B, ROW_HIGH_B, ROW_MID, ROW_MID, ROW_MID, ROW_MID,
    ROW_MID, ROW_MID, ROW_MID, ROW_MID, ROW_MID, ROW_MID, ROW_MID, ROW_MID, ROW_LOW,
    ROW_LOW, ROW_LOW, ROW_LOW,
];

/// 表 B.2b: 30 个子带
const ALLOC_ROWS_B: [&[u8]; 30] = [
    ROW_HIGH_A, ROW_HIGH_A, ROW_HIGH_A, ROW_HIGH_B, ROW_HIGH_B, ROW_HIGH_B, ROW_HIGH_B,
    ROW_HIGH_B, ROW_HIGH_B, ROW_HIGH_B, ROW_HIGH_B, ROW_MID, ROW_MID, ROW_MID, ROW_MID,
    ROW_MID, ROW_MID, ROW_MID, ROW_MID, ROW_MID, ROW_MID, ROW_MID, ROW_MID, ROW_LOW,
    ROW_LOW, ROW_LOW, ROW_LOW, ROW_LOW, ROW_LOW, ROW_LOW,
];

/// 表 B.2c: 8 个子带 (低码率)
const ALLOC_ROWS_C: [&[u8]; 8] = [
    ROW_LBR_HIGH, ROW_LBR_HIGH, ROW_LBR_LOW, ROW_LBR_LOW, ROW_LBR_LOW, ROW_LBR_LOW,
    ROW_LBR_LOW, ROW_LBR_LOW,
];

/// 表 B.2d: 12 个子带 (低码率, 32 kHz)
const ALLOC_ROWS_D: [&[u8]; 12] = [
    ROW_LBR_HIGH, ROW_LBR_HIGH, ROW_LBR_LOW, ROW_LBR_LOW, ROW_LBR_LOW, ROW_LBR_LOW,
    ROW_LBR_LOW, ROW_LBR_LOW, ROW_LBR_LOW, ROW_LBR_LOW, ROW_LBR_LOW, ROW_LBR_LOW,
];

/// 四组标准比特分配表
pub static ALLOC_TABLES: [AllocTable; 4] = [
    AllocTable {
        index: 0,
        sblimit: 27,
        rows: &ALLOC_ROWS_A,
    },
    AllocTable {
        index: 1,
        sblimit: 30,
        rows: &ALLOC_ROWS_B,
    },
    AllocTable {
        index: 2,
        sblimit: 8,
        rows: &ALLOC_ROWS_C,
    },
    AllocTable {
        index: 3,
        sblimit: 12,
        rows: &ALLOC_ROWS_D,
    },
];

/// 根据采样率与每声道比特率选择 Layer II 比特分配表
///
/// `bitrate` 为整帧比特率 (kbps), 0 表示自由格式.
pub fn select_alloc_table(sample_rate: u32, bitrate: u32, channels: u32) -> &'static AllocTable {
    let per_channel = bitrate / channels.max(1);
    let low_rate = bitrate != 0 && per_channel <= 48;

    let index = if sample_rate != 48000 && (bitrate == 0 || per_channel >= 96) {
        1
    } else if sample_rate != 32000 && low_rate {
        2
    } else if sample_rate == 32000 && low_rate {
        3
    } else {
        0
    };
    &ALLOC_TABLES[index]
}

/// 合成窗口系数 D[i] (ISO/IEC 11172-3 表 B.3), 共 512 项
#[allow(clippy::excessive_precision)]
pub const SYNTH_WINDOW: [f32; 512] = [
    0.000000000, -0.000015259, -0.000015259, -0.000015259, -0.000015259, -0.000015259, -0.000015259, -0.000030518,
    -0.000030518, -0.000030518, -0.000030518, -0.000045776, -0.000045776, -0.000061035, -0.000061035, -0.000076294,
    -0.000076294, -0.000091553, -0.000106812, -0.000106812, -0.000122070, -0.000137329, -0.000152588, -0.000167847,
    -0.000198364, -0.000213623, -0.000244141, -0.000259399, -0.000289917, -0.000320435, -0.000366211, -0.000396729,
    -0.000442505, -0.000473022, -0.000534058, -0.000579834, -0.000625610, -0.000686646, -0.000747681, -0.000808716,
    -0.000885010, -0.000961304, -0.001037598, -0.001113892, -0.001205444, -0.001296997, -0.001388550, -0.001480103,
    -0.001586914, -0.001693726, -0.001785278, -0.001907349, -0.002014160, -0.002120972, -0.002243042, -0.002349854,
    -0.002456665, -0.002578735, -0.002685547, -0.002792358, -0.002899170, -0.002990723, -0.003082275, -0.003173828,
    0.003250122, 0.003326416, 0.003387451, 0.003433228, 0.003463745, 0.003479004, 0.003479004, 0.003463745,
    0.003417969, 0.003372192, 0.003280640, 0.003173828, 0.003051758, 0.002883911, 0.002700806, 0.002487183,
    0.002227783, 0.001937866, 0.001617432, 0.001266479, 0.000869751, 0.000442505, -0.000030518, -0.000549316,
    -0.001098633, -0.001693726, -0.002334595, -0.003005981, -0.003723145, -0.004486084, -0.005294800, -0.006118774,
    -0.007003784, -0.007919312, -0.008865356, -0.009841919, -0.010848999, -0.011886597, -0.012939453, -0.014022827,
    -0.015121460, -0.016235352, -0.017349243, -0.018463135, -0.019577026, -0.020690918, -0.021789551, -0.022857666,
    -0.023910522, -0.024932861, -0.025909424, -0.026840210, -0.027725220, -0.028533936, -0.029281616, -0.029937744,
    -0.030532837, -0.031005859, -0.031387329, -0.031661987, -0.031814575, -0.031845093, -0.031738281, -0.031478882,
    0.031082153, 0.030517578, 0.029785156, 0.028884888, 0.027801514, 0.026535034, 0.025085449, 0.023422241,
    0.021575928, 0.019531250, 0.017257690, 0.014801025, 0.012115479, 0.009231567, 0.006134033, 0.002822876,
    -0.000686646, -0.004394531, -0.008316040, -0.012420654, -0.016708374, -0.021179199, -0.025817871, -0.030609131,
    -0.035552979, -0.040634155, -0.045837402, -0.051132202, -0.056533813, -0.061996460, -0.067520142, -0.073059082,
    -0.078628540, -0.084182739, -0.089706421, -0.095169067, -0.100540161, -0.105819702, -0.110946655, -0.115921021,
    -0.120697021, -0.125259399, -0.129562378, -0.133590698, -0.137298584, -0.140670776, -0.143676758, -0.146255493,
    -0.148422241, -0.150115967, -0.151306152, -0.151962280, -0.152069092, -0.151596069, -0.150497437, -0.148773193,
    -0.146362305, -0.143264771, -0.139450073, -0.134887695, -0.129577637, -0.123474121, -0.116577148, -0.108856201,
    0.100311279, 0.090927124, 0.080688477, 0.069595337, 0.057617187, 0.044784546, 0.031082153, 0.016510010,
    0.001068115, -0.015228271, -0.032379150, -0.050354004, -0.069168091, -0.088775635, -0.109161377, -0.130310059,
    -0.152206421, -0.174789429, -0.198059082, -0.221984863, -0.246505737, -0.271591187, -0.297210693, -0.323318481,
    -0.349868774, -0.376800537, -0.404083252, -0.431655884, -0.459472656, -0.487472534, -0.515609741, -0.543823242,
    -0.572036743, -0.600219727, -0.628295898, -0.656219482, -0.683914185, -0.711318970, -0.738372803, -0.765029907,
    -0.791213989, -0.816864014, -0.841949463, -0.866363525, -0.890090942, -0.913055420, -0.935195923, -0.956481934,
    -0.976852417, -0.996246338, -1.014617920, -1.031936646, -1.048156738, -1.063217163, -1.077117920, -1.089782715,
    -1.101211548, -1.111373901, -1.120223999, -1.127746582, -1.133926392, -1.138763428, -1.142211914, -1.144287109,
    1.144989014, 1.144287109, 1.142211914, 1.138763428, 1.133926392, 1.127746582, 1.120223999, 1.111373901,
    1.101211548, 1.089782715, 1.077117920, 1.063217163, 1.048156738, 1.031936646, 1.014617920, 0.996246338,
    0.976852417, 0.956481934, 0.935195923, 0.913055420, 0.890090942, 0.866363525, 0.841949463, 0.816864014,
    0.791213989, 0.765029907, 0.738372803, 0.711318970, 0.683914185, 0.656219482, 0.628295898, 0.600219727,
    0.572036743, 0.543823242, 0.515609741, 0.487472534, 0.459472656, 0.431655884, 0.404083252, 0.376800537,
    0.349868774, 0.323318481, 0.297210693, 0.271591187, 0.246505737, 0.221984863, 0.198059082, 0.174789429,
    0.152206421, 0.130310059, 0.109161377, 0.088775635, 0.069168091, 0.050354004, 0.032379150, 0.015228271,
    -0.001068115, -0.016510010, -0.031082153, -0.044784546, -0.057617187, -0.069595337, -0.080688477, -0.090927124,
    0.100311279, 0.108856201, 0.116577148, 0.123474121, 0.129577637, 0.134887695, 0.139450073, 0.143264771,
    0.146362305, 0.148773193, 0.150497437, 0.151596069, 0.152069092, 0.151962280, 0.151306152, 0.150115967,
    0.148422241, 0.146255493, 0.143676758, 0.140670776, 0.137298584, 0.133590698, 0.129562378, 0.125259399,
    0.120697021, 0.115921021, 0.110946655, 0.105819702, 0.100540161, 0.095169067, 0.089706421, 0.084182739,
    0.078628540, 0.073059082, 0.067520142, 0.061996460, 0.056533813, 0.051132202, 0.045837402, 0.040634155,
    0.035552979, 0.030609131, 0.025817871, 0.021179199, 0.016708374, 0.012420654, 0.008316040, 0.004394531,
    0.000686646, -0.002822876, -0.006134033, -0.009231567, -0.012115479, -0.014801025, -0.017257690, -0.019531250,
    -0.021575928, -0.023422241, -0.025085449, -0.026535034, -0.027801514, -0.028884888, -0.029785156, -0.030517578,
    0.031082153, 0.031478882, 0.031738281, 0.031845093, 0.031814575, 0.031661987, 0.031387329, 0.031005859,
    0.030532837, 0.029937744, 0.029281616, 0.028533936, 0.027725220, 0.026840210, 0.025909424, 0.024932861,
    0.023910522, 0.022857666, 0.021789551, 0.020690918, 0.019577026, 0.018463135, 0.017349243, 0.016235352,
    0.015121460, 0.014022827, 0.012939453, 0.011886597, 0.010848999, 0.009841919, 0.008865356, 0.007919312,
    0.007003784, 0.006118774, 0.005294800, 0.004486084, 0.003723145, 0.003005981, 0.002334595, 0.001693726,
    0.001098633, 0.000549316, 0.000030518, -0.000442505, -0.000869751, -0.001266479, -0.001617432, -0.001937866,
    -0.002227783, -0.002487183, -0.002700806, -0.002883911, -0.003051758, -0.003173828, -0.003280640, -0.003372192,
    -0.003417969, -0.003463745, -0.003479004, -0.003479004, -0.003463745, -0.003433228, -0.003387451, -0.003326416,
    0.003250122, 0.003173828, 0.003082275, 0.002990723, 0.002899170, 0.002792358, 0.002685547, 0.002578735,
    0.002456665, 0.002349854, 0.002243042, 0.002120972, 0.002014160, 0.001907349, 0.001785278, 0.001693726,
    0.001586914, 0.001480103, 0.001388550, 0.001296997, 0.001205444, 0.001113892, 0.001037598, 0.000961304,
    0.000885010, 0.000808716, 0.000747681, 0.000686646, 0.000625610, 0.000579834, 0.000534058, 0.000473022,
    0.000442505, 0.000396729, 0.000366211, 0.000320435, 0.000289917, 0.000259399, 0.000244141, 0.000213623,
    0.000198364, 0.000167847, 0.000152588, 0.000137329, 0.000122070, 0.000106812, 0.000106812, 0.000091553,
    0.000076294, 0.000076294, 0.000061035, 0.000061035, 0.000045776, 0.000045776, 0.000030518, 0.000030518,
    0.000030518, 0.000030518, 0.000015259, 0.000015259, 0.000015259, 0.000015259, 0.000015259, 0.000015259,
];

/// 矩阵化系数 N[i][k] = cos((16 + i)(2k + 1)π / 64), 按 1e-9 精度取整
static SYNTH_MATRIX: OnceLock<[[f32; 32]; 64]> = OnceLock::new();

/// 获取 64x32 矩阵化系数
pub fn synth_matrix() -> &'static [[f32; 32]; 64] {
    SYNTH_MATRIX.get_or_init(|| {
        let mut matrix = [[0.0f32; 32]; 64];
        for (i, row) in matrix.iter_mut().enumerate() {
            for (k, coef) in row.iter_mut().enumerate() {
                let angle = (16 + i) as f64 * (2 * k + 1) as f64 * std::f64::consts::PI / 64.0;
                let value = (1e9 * angle.cos()).round();
                *coef = (value * 1e-9) as f32;
            }
        }
        matrix
    })
}
