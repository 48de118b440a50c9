//! Aritmética de largura fixa com saturação
//!
//! Todos os registradores do modelo têm largura em bits configurável. As
//! funções aqui operam em `u64` e grampeiam no máximo representável da
//! largura pedida em vez de dar a volta.

/// Maior valor representável em `width` bits (`width` em 1..=64)
#[inline]
pub fn width_max(width: u32) -> u64 {
    debug_assert!((1..=64).contains(&width));
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Soma `a + b` grampeada em `2^width - 1`
///
/// Equivale à detecção de overflow por soma em largura estendida: o bit de
/// carry força a saída para o máximo.
#[inline]
pub fn saturating_add(a: u64, b: u64, width: u32) -> u64 {
    let max = width_max(width);
    match a.checked_add(b) {
        Some(sum) if sum <= max => sum,
        _ => max,
    }
}

/// Incremento unitário com saturação
#[inline]
pub fn saturating_inc(value: u64, width: u32) -> u64 {
    saturating_add(value, 1, width)
}

/// Grampeia um valor externo na largura do registrador
#[inline]
pub fn clamp_to_width(value: u64, width: u32) -> u64 {
    value.min(width_max(width))
}

/// Largura do temporizador de atividade: ⌈log2(WINDOW+1)⌉ + 1 bits
pub fn timer_bits(window: u32) -> u32 {
    let span = u64::from(window) + 1;
    let ceil_log2 = if span <= 1 {
        0
    } else {
        64 - (span - 1).leading_zeros()
    };
    ceil_log2 + 1
}
